use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

/// Write an executable `sh` script standing in for the packer binary.
///
/// The executor invokes it as `<script> -machine-readable <command> ...`;
/// `body` decides what to do with those arguments (usually ignore them and
/// emit protocol lines on stdout).
pub fn fake_tool(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write fake tool script");
    let mut perms = fs::metadata(&path).expect("stat fake tool script").permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).expect("chmod fake tool script");
    path
}
