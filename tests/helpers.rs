// Shared test helpers for building archives and test configurations.
//
// This module provides common utilities used across multiple test files to reduce duplication.

use std::io::Write;
use std::path::Path;

use flate2::write::GzEncoder;
use flate2::Compression;
use geoiplookup::Config;
use tar::{Builder, EntryType, Header};

/// Builds a tar.gz archive in memory from `(path, content)` regular-file entries.
#[allow(dead_code)] // Used by other test files
pub fn tar_gz(files: &[(&str, &[u8])]) -> Vec<u8> {
    gzip(&tar_bytes(files))
}

/// Like [`tar_gz`], but the tar stream is cut off after `keep` bytes.
#[allow(dead_code)] // Used by other test files
pub fn truncated_tar_gz(files: &[(&str, &[u8])], keep: usize) -> Vec<u8> {
    let mut tar = tar_bytes(files);
    tar.truncate(keep);
    gzip(&tar)
}

fn tar_bytes(files: &[(&str, &[u8])]) -> Vec<u8> {
    let mut tar_builder = Builder::new(Vec::new());
    for (name, content) in files {
        let mut header = Header::new_gnu();
        header.set_path(name).expect("Failed to set entry path");
        header.set_entry_type(EntryType::Regular);
        header.set_size(content.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        tar_builder
            .append(&header, *content)
            .expect("Failed to append tar entry");
    }
    tar_builder.into_inner().expect("Failed to finish tar")
}

fn gzip(bytes: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes).expect("Failed to gzip archive");
    encoder.finish().expect("Failed to finish gzip stream")
}

/// An archive shaped like the one MaxMind ships.
#[allow(dead_code)] // Used by other test files
pub fn vendor_archive(mmdb: &[u8]) -> Vec<u8> {
    tar_gz(&[
        ("GeoLite2-Country_20240102/COPYRIGHT.txt", b"Database and Contents Copyright (c) MaxMind"),
        ("GeoLite2-Country_20240102/GeoLite2-Country.mmdb", mmdb),
        ("GeoLite2-Country_20240102/LICENSE.txt", b"Use of this MaxMind product is governed by..."),
    ])
}

/// Configuration rooted in `root`: data dir `root/data`, staging file `root/staging.tar.gz`.
#[allow(dead_code)] // Used by other test files
pub fn test_config(root: &Path, license_key: Option<&str>) -> Config {
    Config {
        data_dir: root.join("data"),
        staging_path: root.join("staging.tar.gz"),
        license_key: license_key.map(str::to_string),
        ..Default::default()
    }
}
