//! File name helpers

/// Characters that are not allowed in file names on common platforms
const RESERVED: &[char] = &['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

/// Make `name` safe to use as a single file name.
///
/// Reserved characters and control characters are dropped, as are trailing
/// dots and spaces, so `G3DSA:3.10.129.110` becomes `G3DSA3.10.129.110`.
pub fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| !RESERVED.contains(c) && !c.is_control())
        .collect();

    cleaned.trim_end_matches(['.', ' ']).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("G3DSA:3.10.129.110"), "G3DSA3.10.129.110");
        assert_eq!(
            sanitize_filename("reviewed_IPR036736_2830.fasta"),
            "reviewed_IPR036736_2830.fasta"
        );
        assert_eq!(sanitize_filename("a/b\\c*d?e\"f<g>h|i"), "abcdefghi");
        assert_eq!(sanitize_filename("name\t\n. ."), "name");
        assert_eq!(sanitize_filename("sp|P12345|ACP"), "spP12345ACP");
    }
}
