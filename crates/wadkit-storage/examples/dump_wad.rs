//! List the lumps of an archive chain, in lookup order.
//!
//! Usage:
//!   cargo run --example dump_wad -p wadkit-storage -- /path/to/id1 "base;start"
//!
//! Set `RUST_LOG=debug` to see archives that were not found.

use wadkit_formats::wad::lump_type;
use wadkit_storage::{ArchiveChain, ArchiveResolver, StorageConfig};

fn type_name(tag: u8) -> &'static str {
    match tag {
        lump_type::NONE => "none",
        lump_type::LABEL => "label",
        lump_type::PALETTE => "palette",
        lump_type::QTEX => "qtex",
        lump_type::QPIC => "qpic",
        lump_type::SOUND => "sound",
        lump_type::MIPTEX => "miptex",
        _ => "?",
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let base = args.next().unwrap_or_else(|| "./id1".to_string());
    let list = args.next().unwrap_or_else(|| "gfx".to_string());

    let config = StorageConfig::new(&base);
    let resolver = ArchiveResolver::from_config(&config);
    let chain = ArchiveChain::load(&resolver, &list);

    println!("{} archives from {:?} in {}\n", chain.len(), list, base);
    for archive in chain.archives() {
        println!(
            "{} ({}, {} lumps)",
            archive.name(),
            archive.magic(),
            archive.entries().len()
        );
        for entry in archive.entries() {
            println!(
                "    {:<16} {:>7} {:>10} {:>8}",
                entry.name.to_string(),
                type_name(entry.lump_type),
                entry.offset,
                entry.size,
            );
        }
        println!();
    }
}
