// Stable identity: scopes all history queries to one physical node instance,
// surviving address and capacity changes. Pure string work, no failure mode.

/// Sentinel host for masked, CGNAT'd or unparseable addresses.
pub const PRIVATE_HOST: &str = "private";

/// `"<pubkey>-<host>-<network>"`. The host is the address with its port
/// stripped, or [`PRIVATE_HOST`] when no routable host can be extracted.
pub fn derive_identity(public_key: &str, address: &str, network: &str) -> String {
    format!("{}-{}-{}", public_key, host_component(address), network)
}

/// Capacity-qualified variant, for fleets that re-register with a different
/// committed capacity on the same key/host.
pub fn derive_identity_with_capacity(
    public_key: &str,
    address: &str,
    network: &str,
    committed_bytes: u64,
) -> String {
    format!(
        "{}-{}",
        derive_identity(public_key, address, network),
        committed_bytes
    )
}

fn host_component(address: &str) -> String {
    let trimmed = address.trim();
    if trimmed.is_empty() {
        return PRIVATE_HOST.to_string();
    }
    let lower = trimmed.to_ascii_lowercase();
    if lower.contains("cgnat") || lower == "masked" || lower == PRIVATE_HOST {
        return PRIVATE_HOST.to_string();
    }

    // Bracketed IPv6: "[::1]:6000" -> "::1"
    if let Some(rest) = trimmed.strip_prefix('[') {
        return match rest.split_once(']') {
            Some((host, _)) if !host.is_empty() => host.to_string(),
            _ => PRIVATE_HOST.to_string(),
        };
    }

    // "host:port" -> "host". A bare IPv6 address has colons in the host
    // itself; only strip when the remainder is a plain numeric port.
    match trimmed.rsplit_once(':') {
        Some((host, port))
            if !port.is_empty()
                && port.bytes().all(|b| b.is_ascii_digit())
                && !host.contains(':') =>
        {
            if host.is_empty() {
                PRIVATE_HOST.to_string()
            } else {
                host.to_string()
            }
        }
        _ => trimmed.to_string(),
    }
}
