/*!
 * Tests for ISO language code utilities
 */

use newsbridge::language_utils::{get_language_name, normalize_to_part2t};

#[test]
fn test_normalizeToPart2t_shouldAcceptAllForms() {
    assert_eq!(normalize_to_part2t("EN").unwrap(), "eng");
    assert_eq!(normalize_to_part2t(" fre ").unwrap(), "fra");
    assert_eq!(normalize_to_part2t("vie").unwrap(), "vie");
}

#[test]
fn test_normalizeToPart2t_withInvalidCode_shouldFail() {
    assert!(normalize_to_part2t("xyz").is_err());
    assert!(normalize_to_part2t("").is_err());
}

#[test]
fn test_getLanguageName_shouldReturnEnglishName() {
    assert_eq!(get_language_name("en").unwrap(), "English");
    assert_eq!(get_language_name("vie").unwrap(), "Vietnamese");
    assert!(get_language_name("qq").is_err());
}
