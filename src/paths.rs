use regex::Regex;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use walkdir::WalkDir;

fn dump_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(?:r_)?([A-Za-z0-9_]+)\.(?:jsonl|ndjson)(?:\.zst)?$|^(?:r_)?([A-Za-z0-9_]+)\.zst$").unwrap())
}

/// Community name a dump file belongs to, if the name matches
/// `<community>.jsonl`, `<community>.ndjson`, `<community>.jsonl.zst` or `<community>.zst`
/// (optionally prefixed with `r_`).
pub fn community_of(file_name: &str) -> Option<String> {
    let caps = dump_name_re().captures(file_name)?;
    caps.get(1).or_else(|| caps.get(2)).map(|m| m.as_str().to_string())
}

/// Map lowercase community name -> dump path for the top level of `dir`.
/// When a community has both a plain and a compressed dump, the plain one wins.
pub fn discover_dumps(dir: &Path) -> BTreeMap<String, PathBuf> {
    let mut map: BTreeMap<String, PathBuf> = BTreeMap::new();
    if !dir.exists() {
        return map;
    }
    for ent in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name().into_iter().flatten() {
        if !ent.file_type().is_file() {
            continue;
        }
        let Some(name) = ent.file_name().to_str() else { continue };
        let Some(community) = community_of(name) else { continue };
        let key = community.to_lowercase();
        let path = ent.path().to_path_buf();
        let plain = !crate::zstd_jsonl::is_zst(&path);
        match map.get(&key) {
            Some(existing) if !crate::zstd_jsonl::is_zst(existing) || !plain => {}
            _ => { map.insert(key, path); }
        }
    }
    map
}
