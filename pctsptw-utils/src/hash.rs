use std::path::{Component, Path};

pub fn u8s_from_str(input: &str) -> [u8; 32] {
    blake3::hash(input.as_bytes()).into()
}

/// First 8 bytes of the blake3 digest of `input`, read as a big-endian integer.
pub fn u64_from_str(input: &str) -> u64 {
    let u8s = u8s_from_str(input);
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&u8s[..8]);
    u64::from_be_bytes(prefix)
}

/// Rewrites Windows separators so the same instance hashes identically on every platform.
pub fn normalize_rel_path(rel_path: &str) -> String {
    rel_path.replace('\\', "/")
}

/// Joins the normal components of a relative path with `/`.
pub fn rel_path_key(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<String>>()
        .join("/")
}

/// Per-instance seed: `global_seed` and the normalized relative path are joined
/// with `::` and hashed. The decimal seed never contains `:`, so the split is unambiguous.
pub fn derive_instance_seed(global_seed: u64, rel_path: &str) -> u64 {
    u64_from_str(&format!(
        "{}::{}",
        global_seed,
        normalize_rel_path(rel_path)
    ))
}
