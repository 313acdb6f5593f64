#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]
//! Integration tests for archive chains and the resource blob on disk
//!
//! Archives are written to a temporary game directory laid out like a Quake
//! install: loose map texture archives next to `gfx/` and `gfx.wad`.

use proptest::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use wadkit_formats::test_utils::WadFixture;
use wadkit_formats::wad::lump_type;
use wadkit_storage::{ArchiveChain, ArchiveResolver, ResourceContext, StorageConfig};

fn game_dir() -> TempDir {
    let dir = tempfile::tempdir().expect("temp dir");
    fs::create_dir(dir.path().join("gfx")).expect("gfx dir");
    dir
}

fn write(dir: &Path, name: &str, image: Vec<u8>) {
    fs::write(dir.join(name), image).unwrap_or_else(|e| panic!("Failed to write {name}: {e}"));
}

// --- Chain override ---

#[test]
fn chain_last_listed_archive_wins() {
    let dir = game_dir();
    write(
        dir.path(),
        "a.wad",
        WadFixture::new()
            .lump("X", lump_type::MIPTEX, b"texture from a")
            .build(),
    );
    write(
        dir.path(),
        "b.wad",
        WadFixture::new()
            .lump("x", lump_type::MIPTEX, b"texture from b")
            .build(),
    );

    let mut ctx = ResourceContext::new(StorageConfig::new(dir.path()));
    ctx.load_chain("a;b");
    let (entry, archive) = ctx.find_in_chain("x").expect("x defined twice");
    assert_eq!(archive.name(), "b.wad");
    assert_eq!(entry.size, 14);

    ctx.load_chain("b;a");
    assert_eq!(ctx.find_in_chain("X").unwrap().1.name(), "a.wad");
}

#[test]
fn chain_editor_paths_and_fallback_directory() {
    let dir = game_dir();
    write(
        dir.path(),
        "gfx/base.wad",
        WadFixture::new().lump("+0slime", lump_type::MIPTEX, &[1; 40]).build(),
    );

    let resolver = ArchiveResolver::from_config(&StorageConfig::new(dir.path()));
    let mut chain = ArchiveChain::load(&resolver, "\\quake\\id1\\gfx\\base.wad");
    assert_eq!(chain.len(), 1);
    assert_eq!(chain.archives().next().unwrap().name(), "gfx/base.wad");
    assert_eq!(chain.read_lump("+0SLIME").unwrap(), vec![1; 40]);
}

// --- Recoverable failures ---

#[test]
fn chain_zero_lump_archive_not_added() {
    let dir = game_dir();
    write(dir.path(), "empty.wad", WadFixture::new().build());

    let resolver = ArchiveResolver::from_config(&StorageConfig::new(dir.path()));
    let chain = ArchiveChain::load(&resolver, "empty");
    assert!(chain.is_empty());
}

#[test]
fn chain_bad_magic_member_skipped() {
    let dir = game_dir();
    write(
        dir.path(),
        "bad.wad",
        WadFixture::new()
            .magic(*b"BAD!")
            .lump("shared", lump_type::NONE, b"bad")
            .build(),
    );
    write(
        dir.path(),
        "good.wad",
        WadFixture::new().lump("shared", lump_type::NONE, b"good").build(),
    );
    write(dir.path(), "garbage.wad", b"not an archive at all".to_vec());

    let resolver = ArchiveResolver::from_config(&StorageConfig::new(dir.path()));
    let mut chain = ArchiveChain::load(&resolver, "good;bad;absent;garbage");
    assert_eq!(chain.len(), 1);
    assert_eq!(chain.read_lump("shared").unwrap(), b"good");
}

// --- Untrusted directories ---

#[test]
fn chain_disk_size_recovers_packed_length() {
    let dir = game_dir();
    let image = WadFixture::new()
        .lump("payload", lump_type::NONE, &[5; 32])
        .raw_record("packed", 12, 1_000_000, 24, lump_type::NONE)
        .build();
    write(dir.path(), "packed.wad", image);

    let resolver = ArchiveResolver::from_config(&StorageConfig::new(dir.path()));
    let chain = ArchiveChain::load(&resolver, "packed");
    assert_eq!(chain.find("packed").unwrap().0.size, 24);
}

#[test]
fn blob_far_lump_never_reads_out_of_bounds() {
    let dir = game_dir();
    let image = WadFixture::new()
        .picture("disc", 4, 4, &[7; 16])
        .raw_record("far", 10_000_000, 128, 128, lump_type::QPIC)
        .build();
    let length = image.len();
    write(dir.path(), "gfx.wad", image);

    for sanitize in [true, false] {
        let config = StorageConfig::new(dir.path()).with_blob_sanitization(sanitize);
        let mut ctx = ResourceContext::new(config);
        let blob = ctx.load_blob().unwrap();
        let far = blob.find_by_name("far").unwrap();
        if sanitize {
            assert_eq!(far.len(), length.min(128));
        } else {
            assert!(far.is_empty());
        }
        assert_eq!(blob.picture("disc").unwrap().pixels, &[7; 16]);
    }
}

#[test]
fn blob_bad_magic_is_unrecoverable() {
    let dir = game_dir();
    write(
        dir.path(),
        "gfx.wad",
        WadFixture::new()
            .magic(*b"BAD!")
            .lump("conchars", lump_type::MIPTEX, &[0; 8])
            .build(),
    );

    let mut ctx = ResourceContext::new(StorageConfig::new(dir.path()));
    let err = ctx.load_blob().unwrap_err();
    assert!(err.is_unrecoverable(), "{err}");
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Every lump of an adversarial directory reads back within the archive
    #[test]
    fn chain_adversarial_directories_stay_in_bounds(
        records in prop::collection::vec((any::<i32>(), any::<i32>(), any::<i32>()), 1..16)
    ) {
        let dir = game_dir();
        let mut fixture = WadFixture::new().lump("anchor", lump_type::NONE, &[9; 64]);
        for (i, (filepos, size, disksize)) in records.iter().enumerate() {
            fixture = fixture.raw_record(&format!("lump{i}"), *filepos, *size, *disksize, lump_type::NONE);
        }
        let image = fixture.build();
        let length = image.len() as u64;
        write(dir.path(), "fuzz.wad", image);

        let resolver = ArchiveResolver::from_config(&StorageConfig::new(dir.path()));
        let mut chain = ArchiveChain::load(&resolver, "fuzz");
        prop_assert_eq!(chain.len(), 1);

        let entries = chain.archives().next().unwrap().entries().to_vec();
        for entry in &entries {
            prop_assert!(entry.offset + entry.size <= length);
        }
        for i in 0..records.len() {
            let data = chain.read_lump(format!("lump{i}")).unwrap();
            prop_assert!(data.len() as u64 <= length);
        }
    }
}
