//! Architecture naming.
//!
//! Settings use canonical architecture identifiers (`x86_64`, `armv8`, ...).
//! Debian-style host package managers name the same architectures
//! differently (`amd64`, `arm64`, ...), and cross packages are addressed as
//! `<package>:<arch>`.

/// Canonical architecture identifier to Debian package suffix.
pub const ARCH_NAMES: &[(&str, &str)] = &[
    ("x86_64", "amd64"),
    ("x86", "i386"),
    ("ppc32", "powerpc"),
    ("ppc64le", "ppc64el"),
    ("armv7", "arm"),
    ("armv7hf", "armhf"),
    ("armv8", "arm64"),
    ("s390x", "s390x"),
];

/// Canonical architecture identifier to GNU target triplet, used for
/// `--build`/`--host` when configuring a cross build.
const GNU_TRIPLETS: &[(&str, &str)] = &[
    ("x86_64", "x86_64-linux-gnu"),
    ("x86", "i686-linux-gnu"),
    ("ppc32", "powerpc-linux-gnu"),
    ("ppc64le", "powerpc64le-linux-gnu"),
    ("armv7", "arm-linux-gnueabi"),
    ("armv7hf", "arm-linux-gnueabihf"),
    ("armv8", "aarch64-linux-gnu"),
    ("s390x", "s390x-linux-gnu"),
    ("riscv64", "riscv64-linux-gnu"),
];

/// Look up the package suffix for an architecture, if it has one.
pub fn lookup(arch: &str) -> Option<&'static str> {
    ARCH_NAMES
        .iter()
        .find(|(canonical, _)| *canonical == arch)
        .map(|(_, mapped)| *mapped)
}

/// Map an architecture to its package suffix.
///
/// Unknown architectures pass through unchanged.
pub fn map_arch(arch: &str) -> &str {
    lookup(arch).unwrap_or(arch)
}

/// Name of the cross package for `arch`.
///
/// Architectures without a known suffix resolve to the bare (native)
/// package name.
pub fn cross_package_name(package: &str, arch: &str) -> String {
    if lookup(arch).is_none() {
        return package.to_string();
    }
    format!("{}:{}", package, map_arch(arch))
}

/// GNU triplet for a Linux target architecture.
pub fn gnu_triplet(arch: &str) -> Option<&'static str> {
    GNU_TRIPLETS
        .iter()
        .find(|(canonical, _)| *canonical == arch)
        .map(|(_, triplet)| *triplet)
}

/// Canonical identifier of the architecture this binary runs on.
pub fn host_arch() -> &'static str {
    match std::env::consts::ARCH {
        "x86_64" => "x86_64",
        "x86" => "x86",
        "aarch64" => "armv8",
        "arm" => "armv7hf",
        "powerpc" => "ppc32",
        "powerpc64" => "ppc64le",
        "s390x" => "s390x",
        "riscv64" => "riscv64",
        other => other,
    }
}
