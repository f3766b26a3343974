//! Object path helpers
//!
//! Object paths look like `/Game/Props/SM_Rock.SM_Rock`: the package name
//! (`/Game/Props/SM_Rock`) followed by `.` and the object name. The long
//! package path is the directory part of the package name (`/Game/Props`).

/// Package name part of an object path
pub fn package_name(object_path: &str) -> &str {
    match object_path.rfind('.') {
        Some(dot) if dot > object_path.rfind('/').unwrap_or(0) => &object_path[..dot],
        _ => object_path,
    }
}

/// Object name part of an object path
pub fn object_name(object_path: &str) -> &str {
    let package = package_name(object_path);
    if package.len() < object_path.len() {
        &object_path[package.len() + 1..]
    } else {
        package.rsplit('/').next().unwrap_or(package)
    }
}

/// Directory holding the package of an object path
pub fn long_package_path(object_path: &str) -> &str {
    let package = package_name(object_path);
    match package.rfind('/') {
        Some(0) | None => "/",
        Some(slash) => &package[..slash],
    }
}

/// Build the object path of an asset named `name` inside `package_path`
pub fn object_path(package_path: &str, name: &str) -> String {
    let directory = package_path.trim_end_matches('/');
    format!("{directory}/{name}.{name}")
}

/// Whether a name can be used for a new asset
pub fn is_valid_asset_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}
