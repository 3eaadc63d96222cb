//! Substring filtering of rendered report lines.

/// Keep the lines containing `ip` and/or `port`.
///
/// Empty or absent filters are ignored; with both set a line must contain
/// both. This is plain containment, so `10.0.0.1` also keeps `10.0.0.10`.
pub fn filter_lines(text: &str, ip: Option<&str>, port: Option<&str>) -> String {
    let ip = ip.filter(|s| !s.is_empty());
    let port = port.filter(|s| !s.is_empty());

    text.lines()
        .filter(|line| ip.is_none_or(|ip| line.contains(ip)))
        .filter(|line| port.is_none_or(|port| line.contains(port)))
        .collect::<Vec<_>>()
        .join("\n")
}
