use super::*;

fn temp_root(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "catshare_unit_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

#[test]
fn normalize_path_slash_normalization() {
    assert_eq!(normalize_rel_path("a/b.png").unwrap(), "a/b.png");
    assert_eq!(normalize_rel_path("a\\b.png").unwrap(), "a/b.png");
    assert_eq!(normalize_rel_path("./a//b.png").unwrap(), "a/b.png");
    assert!(normalize_rel_path("../x.png").is_err());
    assert!(normalize_rel_path("/abs.png").is_err());
    assert!(normalize_rel_path("./").is_err());
}

#[test]
fn asset_key_path_convention() {
    let key = AssetKey::new("42", "Wholesale").unwrap();
    assert_eq!(key.file_name(), "product_42_Wholesale.png");
    assert_eq!(key.rel_path(), "Wholesale/product_42_Wholesale.png");
    assert_eq!(key.to_string(), key.rel_path());
}

#[test]
fn asset_key_is_pure_and_folders_never_collide() {
    let a = AssetKey::new("7", "Resell").unwrap();
    let b = AssetKey::new("7", "Resell").unwrap();
    assert_eq!(a, b);
    assert_eq!(a.rel_path(), b.rel_path());

    let labels = ["Wholesale", "Resell", "Retail", "Summer Sale"];
    let paths: std::collections::BTreeSet<String> = labels
        .iter()
        .map(|l| AssetKey::new("7", *l).unwrap().rel_path())
        .collect();
    assert_eq!(paths.len(), labels.len());
}

#[test]
fn asset_key_rejects_unsafe_segments() {
    assert!(AssetKey::new("", "Wholesale").is_err());
    assert!(AssetKey::new("1", " ").is_err());
    assert!(AssetKey::new("1/2", "Wholesale").is_err());
    assert!(AssetKey::new("1", "..").is_err());
    assert!(AssetKey::new("1", "a\\b").is_err());
}

#[test]
fn fs_store_write_read_overwrite_delete() {
    let root = temp_root("fs_store");
    let store = FsAssetStore::new(&root);
    let key = AssetKey::new("1", "Resell").unwrap();

    assert!(!store.exists(&key));
    assert!(store.read(&key).is_err());
    assert!(store.resolve_handle(&key).is_err());

    store.write(&key, b"first").unwrap();
    assert!(store.exists(&key));
    assert!(root.join("Resell").is_dir());
    assert_eq!(store.read(&key).unwrap(), b"first");

    store.write(&key, b"second").unwrap();
    assert_eq!(store.read(&key).unwrap(), b"second");

    let uri = store.resolve_handle(&key).unwrap();
    assert!(uri.starts_with("file://"));
    assert!(uri.ends_with("Resell/product_1_Resell.png"));

    store.delete(&key).unwrap();
    assert!(!store.exists(&key));
    store.delete(&key).unwrap();

    std::fs::remove_dir_all(&root).ok();
}
