//! Prometheus text exposition for the cache and resolution counters.

use mxcache_application::use_cases::CacheStats;
use std::fmt::Write;

pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

pub fn render(stats: &CacheStats) -> String {
    let mut output = String::with_capacity(2048);

    output.push_str("# HELP dns_records Records inserted into the cache by type\n");
    output.push_str("# TYPE dns_records counter\n");
    for (kind, value) in [
        ("A", stats.records.a_records),
        ("AAAA", stats.records.aaaa_records),
        ("MX", stats.records.mx_records),
    ] {
        let _ = writeln!(output, "dns_records{{type=\"{}\"}} {}", kind, value);
    }

    gauge(
        &mut output,
        "mxcache_cache_domains",
        "Domains with at least one resolved record kind",
        stats.domains as u64,
    );

    let resolution = &stats.resolution;
    counter(&mut output, "mxcache_cache_hits_total", "Lookups answered from the cache", resolution.hits);
    counter(&mut output, "mxcache_cache_misses_total", "Lookups forwarded upstream", resolution.misses);
    counter(
        &mut output,
        "mxcache_coalesced_lookups_total",
        "Lookups that waited on an in-flight upstream call",
        resolution.coalesced,
    );
    counter(
        &mut output,
        "mxcache_upstream_failures_total",
        "Upstream lookups that failed or timed out",
        resolution.upstream_failures,
    );
    counter(
        &mut output,
        "mxcache_suppressed_lookups_total",
        "Lookups skipped inside the failure grace window",
        resolution.suppressed,
    );

    output.push_str("# HELP mxcache_crawls_total Background MX host resolutions by outcome\n");
    output.push_str("# TYPE mxcache_crawls_total counter\n");
    for (outcome, value) in [
        ("scheduled", resolution.crawls_scheduled),
        ("skipped", resolution.crawls_skipped),
        ("cancelled", resolution.crawls_cancelled),
    ] {
        let _ = writeln!(output, "mxcache_crawls_total{{outcome=\"{}\"}} {}", outcome, value);
    }

    gauge(
        &mut output,
        "mxcache_crawls_running",
        "Background MX host resolutions in progress",
        stats.crawls_running as u64,
    );
    gauge(
        &mut output,
        "mxcache_crawls_pending",
        "Background MX host resolutions running or waiting for a slot",
        stats.crawls_pending as u64,
    );

    output
}

fn counter(output: &mut String, name: &str, help: &str, value: u64) {
    let _ = writeln!(output, "# HELP {} {}", name, help);
    let _ = writeln!(output, "# TYPE {} counter", name);
    let _ = writeln!(output, "{} {}", name, value);
}

fn gauge(output: &mut String, name: &str, help: &str, value: u64) {
    let _ = writeln!(output, "# HELP {} {}", name, help);
    let _ = writeln!(output, "# TYPE {} gauge", name);
    let _ = writeln!(output, "{} {}", name, value);
}
