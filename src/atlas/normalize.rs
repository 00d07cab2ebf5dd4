/// Administrative prefixes stripped from names: regency ("KABUPATEN") and city ("KOTA").
const PREFIX_TOKENS: [&str; 2] = ["KABUPATEN", "KOTA"];

/// Canonical comparison key for a possibly-missing administrative name.
///
/// Uppercases, removes every occurrence of the prefix tokens (also inside other
/// words, e.g. "BAKOTA" loses its "KOTA"), then trims. Removal repeats until the
/// string is stable, so the key is always a fixed point of this function.
pub fn normalize_name(name: Option<&str>) -> String {
    let Some(name) = name else { return String::new() };

    let mut key = name.to_uppercase();
    loop {
        let stripped = PREFIX_TOKENS.iter()
            .fold(key.clone(), |acc, token| acc.replace(token, ""));
        if stripped == key { break }
        key = stripped;
    }

    key.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::normalize_name;

    #[test]
    fn missing_name_is_empty() {
        assert_eq!(normalize_name(None), "");
    }

    #[test]
    fn strips_prefixes() {
        assert_eq!(normalize_name(Some("KABUPATEN ACEH BARAT")), "ACEH BARAT");
        assert_eq!(normalize_name(Some("KOTA MEDAN")), "MEDAN");
        assert_eq!(normalize_name(Some("Kota Banda Aceh ")), "BANDA ACEH");
        assert_eq!(normalize_name(Some("  Aceh Besar")), "ACEH BESAR");
    }

    #[test]
    fn strips_token_inside_words() {
        assert_eq!(normalize_name(Some("Kotabaru")), "BARU");
    }

    #[test]
    fn idempotent() {
        for name in ["KABUPATEN ACEH BARAT", "kota medan", "KOKOTATA", "KABKABUPATENUPATEN X", " ", "Nias Selatan"] {
            let once = normalize_name(Some(name));
            assert_eq!(normalize_name(Some(&once)), once, "not idempotent for {name:?}");
        }
    }

    #[test]
    fn nested_tokens_fully_removed() {
        assert_eq!(normalize_name(Some("KOKOTATA")), "");
    }
}
