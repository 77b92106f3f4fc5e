//! Maps the exporter's part-of-speech tags to the short codes the course
//! service accepts in `item[cue][part_of_speech]`.

/// Code sent when no tag is recognized.
pub const UNSPECIFIED: &str = "NONE";

fn code_for(tag: &str) -> Option<&'static str> {
    let code = match tag {
        "verb" | "transitive verb" | "intransitive verb" | "suru verb"
        | "suru verb - special class" | "ichidan verb" => "V",
        "noun" => "N",
        "phrase" => "E",
        "adjective" | "i-adjective" | "no-adjective" | "na-adjective" => "A",
        // prefix/suffix have no dedicated code; grouped with adverbs
        "adverb" | "prefix" | "suffix" => "D",
        "phrasal verb" => "PH",
        "particle" => "PL",
        "interjection" => "I",
        "interrogative" => "INT",
        "conjunction" => "J",
        "preposition" => "PR",
        "adjectival noun" => "AN",
        "auxiliary verb" => "VA",
        "verbal noun" => "VN",
        "noun abbreviation" => "NA",
        "pronoun" => "NR",
        "proper noun" => "NP",
        "none" => UNSPECIFIED,
        _ => return None,
    };
    Some(code)
}

/// Resolves a comma-separated tag list to one short code. Tags are trimmed
/// and matched case-insensitively; the first recognized tag wins and later
/// tags are never consulted. Anything unrecognized falls back to
/// [`UNSPECIFIED`].
pub fn resolve_code(tags: &str) -> &'static str {
    tags.split(',')
        .map(|tag| tag.trim().to_lowercase())
        .find_map(|tag| code_for(&tag))
        .unwrap_or(UNSPECIFIED)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_recognized_tag_wins() {
        assert_eq!(resolve_code("suru verb, noun"), "V");
        assert_eq!(resolve_code("noun, suru verb"), "N");
    }

    #[test]
    fn unrecognized_tags_are_skipped_over() {
        assert_eq!(resolve_code("wikipedia definition, noun"), "N");
    }

    #[test]
    fn matching_is_case_insensitive_and_trimmed() {
        assert_eq!(resolve_code("Noun"), "N");
        assert_eq!(resolve_code("  I-Adjective , verb"), "A");
    }

    #[test]
    fn verb_variants_share_a_code() {
        for tag in
            ["verb", "transitive verb", "intransitive verb", "suru verb", "ichidan verb"]
        {
            assert_eq!(resolve_code(tag), "V");
        }
    }

    #[test]
    fn empty_or_unknown_input_falls_back() {
        assert_eq!(resolve_code(""), UNSPECIFIED);
        assert_eq!(resolve_code("gibberish"), UNSPECIFIED);
        assert_eq!(resolve_code(",,,"), UNSPECIFIED);
    }

    #[test]
    fn explicit_none_maps_to_unspecified() {
        assert_eq!(resolve_code("none"), UNSPECIFIED);
    }
}
