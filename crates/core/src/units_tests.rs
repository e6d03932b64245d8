// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[yare::parameterized(
    megabytes   = { "80MB",  83_886_080 },
    kilobytes   = { "64kB",  65_536 },
    gigabytes   = { "4GB",   4_294_967_296 },
    bare_number = { "1024",  1_024 },
    bare_bytes  = { "512B",  512 },
    terabytes   = { "1TB",   1_099_511_627_776 },
    padded      = { " 8MB ", 8_388_608 },
    zero        = { "0kB",   0 },
)]
fn memory_sizes_parse(raw: &str, expected: i64) {
    assert_eq!(parse_memory_bytes(raw), Ok(expected));
}

#[yare::parameterized(
    empty      = { "" },
    no_number  = { "MB" },
    negative   = { "-4MB" },
    bad_suffix = { "4XB" },
    fractional = { "1.5GB" },
)]
fn malformed_memory_sizes_err(raw: &str) {
    assert!(parse_memory_bytes(raw).is_err());
}

#[test]
fn huge_sizes_overflow_cleanly() {
    assert!(matches!(parse_memory_bytes("9999999999TB"), Err(UnitError::InvalidNumber(_) | UnitError::Overflow(_))));
}

proptest::proptest! {
    #[test]
    fn parse_never_panics(raw in ".{0,24}") {
        let _ = parse_memory_bytes(&raw);
    }
}

#[yare::parameterized(
    gce_internal = { "host.us-central1-a.c.proj.internal.", Some("us-central1-a") },
    no_dot_tail  = { "db1.test-zone.example.com",           Some("test-zone") },
    single_label = { "localhost",                           None },
    trailing_dot = { "localhost.",                          None },
    empty        = { "",                                    None },
)]
fn zone_extraction(fqdn: &str, expected: Option<&str>) {
    assert_eq!(zone_from_fqdn(fqdn).as_deref(), expected);
}
