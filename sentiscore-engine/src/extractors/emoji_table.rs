// Emoji Sentiment Table - fixed alias → weight lookup
//
// Emoji glyphs are decoded to their English CLDR names (`👍` → `:thumbs_up:`),
// then every table alias is counted by occurrence in the decoded text. Only
// names that equal a table alias contribute; alias text typed literally by
// the author counts the same way. ASCII emoticons are scanned on the raw text
// and contribute at most once each.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Variation selector-16, swallowed after a decoded glyph
const VARIATION_SELECTOR: char = '\u{FE0F}';

/// One table entry
#[derive(Debug, Clone, Copy)]
pub struct EmojiEntry {
    /// `:alias:` token matched against decoded text
    pub alias: &'static str,
    /// Sentiment weight
    pub weight: f64,
}

const fn entry(alias: &'static str, weight: f64) -> EmojiEntry {
    EmojiEntry { alias, weight }
}

/// Emoji sentiment table, in evaluation order
pub static EMOJI_TABLE: &[EmojiEntry] = &[
    // Positive
    entry(":smiley:", 0.4),
    entry(":smile:", 0.3),
    entry(":grinning:", 0.4),
    entry(":grin:", 0.5),
    entry(":blush:", 0.4),
    entry(":innocent:", 0.3),
    entry(":heart_eyes:", 0.6),
    entry(":kissing_heart:", 0.4),
    entry(":kissing:", 0.3),
    entry(":star_struck:", 0.5),
    entry(":yum:", 0.3),
    entry(":stuck_out_tongue:", 0.3),
    entry(":zany_face:", 0.4),
    entry(":wink:", 0.2),
    entry(":+1:", 0.4),
    entry(":clap:", 0.4),
    entry(":pray:", 0.3),
    entry(":fire:", 0.7),
    entry(":sparkles:", 0.4),
    entry(":100:", 0.6),
    entry(":tada:", 0.5),
    entry(":trophy:", 0.5),
    entry(":partying_face:", 0.5),
    entry(":sun_with_face:", 0.4),
    entry(":rocket:", 0.5),
    entry(":boom:", 0.4),
    entry(":laughing:", 0.5),
    entry(":rofl:", 0.6),
    entry(":joy:", 0.6),
    // Neutral
    entry(":neutral_face:", 0.0),
    entry(":expressionless:", 0.0),
    entry(":thinking:", 0.0),
    entry(":no_mouth:", 0.0),
    entry(":raised_eyebrow:", 0.0),
    entry(":monocle_face:", 0.0),
    entry(":zipper_mouth_face:", 0.0),
    // Negative
    entry(":pensive:", -0.3),
    entry(":disappointed:", -0.3),
    entry(":worried:", -0.3),
    entry(":confused:", -0.3),
    entry(":slightly_frowning_face:", -0.3),
    entry(":frowning_face:", -0.4),
    entry(":persevere:", -0.4),
    entry(":cry:", -0.4),
    entry(":sob:", -0.5),
    entry(":angry:", -0.6),
    entry(":symbols_over_mouth:", -0.7),
    entry(":rage:", -0.8),
    entry(":pouting_face:", -0.8),
    entry(":scream:", -0.6),
    entry(":head_bandage:", -0.5),
    entry(":exploding_head:", -0.6),
    entry(":skull:", -0.6),
    entry(":poop:", -0.5),
    entry(":face_vomiting:", -0.6),
    entry(":thermometer_face:", -0.5),
    entry(":nauseated_face:", -0.5),
];

/// Glyph → English emoji name, as produced by the default `en` demojizer
static EMOJI_NAMES: &[(char, &str)] = &[
    ('\u{1F600}', ":grinning_face:"),
    ('\u{1F601}', ":beaming_face_with_smiling_eyes:"),
    ('\u{1F602}', ":face_with_tears_of_joy:"),
    ('\u{1F603}', ":grinning_face_with_big_eyes:"),
    ('\u{1F604}', ":grinning_face_with_smiling_eyes:"),
    ('\u{1F605}', ":grinning_face_with_sweat:"),
    ('\u{1F606}', ":grinning_squinting_face:"),
    ('\u{1F607}', ":smiling_face_with_halo:"),
    ('\u{1F609}', ":winking_face:"),
    ('\u{1F60A}', ":smiling_face_with_smiling_eyes:"),
    ('\u{1F60B}', ":face_savoring_food:"),
    ('\u{1F60D}', ":smiling_face_with_heart-eyes:"),
    ('\u{1F60E}', ":smiling_face_with_sunglasses:"),
    ('\u{1F610}', ":neutral_face:"),
    ('\u{1F611}', ":expressionless_face:"),
    ('\u{1F612}', ":unamused_face:"),
    ('\u{1F614}', ":pensive_face:"),
    ('\u{1F615}', ":confused_face:"),
    ('\u{1F617}', ":kissing_face:"),
    ('\u{1F618}', ":face_blowing_a_kiss:"),
    ('\u{1F61B}', ":face_with_tongue:"),
    ('\u{1F61E}', ":disappointed_face:"),
    ('\u{1F61F}', ":worried_face:"),
    ('\u{1F620}', ":angry_face:"),
    ('\u{1F621}', ":pouting_face:"),
    ('\u{1F622}', ":crying_face:"),
    ('\u{1F623}', ":persevering_face:"),
    ('\u{1F624}', ":face_with_steam_from_nose:"),
    ('\u{1F629}', ":weary_face:"),
    ('\u{1F62B}', ":tired_face:"),
    ('\u{1F62C}', ":grimacing_face:"),
    ('\u{1F62D}', ":loudly_crying_face:"),
    ('\u{1F631}', ":face_screaming_in_fear:"),
    ('\u{1F634}', ":sleeping_face:"),
    ('\u{1F636}', ":face_without_mouth:"),
    ('\u{1F641}', ":slightly_frowning_face:"),
    ('\u{1F642}', ":slightly_smiling_face:"),
    ('\u{1F644}', ":face_with_rolling_eyes:"),
    ('\u{1F64F}', ":folded_hands:"),
    ('\u{1F680}', ":rocket:"),
    ('\u{1F910}', ":zipper-mouth_face:"),
    ('\u{1F912}', ":face_with_thermometer:"),
    ('\u{1F914}', ":thinking_face:"),
    ('\u{1F915}', ":face_with_head-bandage:"),
    ('\u{1F922}', ":nauseated_face:"),
    ('\u{1F923}', ":rolling_on_the_floor_laughing:"),
    ('\u{1F928}', ":face_with_raised_eyebrow:"),
    ('\u{1F929}', ":star-struck:"),
    ('\u{1F92A}', ":zany_face:"),
    ('\u{1F92C}', ":face_with_symbols_on_mouth:"),
    ('\u{1F92E}', ":face_vomiting:"),
    ('\u{1F92F}', ":exploding_head:"),
    ('\u{1F970}', ":smiling_face_with_hearts:"),
    ('\u{1F973}', ":partying_face:"),
    ('\u{1F9D0}', ":face_with_monocle:"),
    ('\u{1F31E}', ":sun_with_face:"),
    ('\u{1F389}', ":party_popper:"),
    ('\u{1F3C6}', ":trophy:"),
    ('\u{1F44C}', ":OK_hand:"),
    ('\u{1F44D}', ":thumbs_up:"),
    ('\u{1F44E}', ":thumbs_down:"),
    ('\u{1F44F}', ":clapping_hands:"),
    ('\u{1F480}', ":skull:"),
    ('\u{1F494}', ":broken_heart:"),
    ('\u{1F4A5}', ":collision:"),
    ('\u{1F4A9}', ":pile_of_poo:"),
    ('\u{1F4AF}', ":hundred_points:"),
    ('\u{1F525}', ":fire:"),
    ('\u{2639}', ":frowning_face:"),
    ('\u{2728}', ":sparkles:"),
    ('\u{2764}', ":red_heart:"),
    ('\u{2B50}', ":star:"),
];

/// ASCII emoticons: (spellings, weight). Each applies at most once per text.
const EMOTICONS: &[(&[&str], f64)] = &[
    (&[":)", ":-)"], 0.1),
    (&[":(", ":-("], -0.1),
    (&[":D", ":-D"], 0.1),
];

static GLYPH_NAMES: Lazy<HashMap<char, &'static str>> =
    Lazy::new(|| EMOJI_NAMES.iter().copied().collect());

/// Replace known emoji glyphs with their `:english_name:` token
///
/// Unknown characters (including undecoded emoji) pass through unchanged.
pub fn demojize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match GLYPH_NAMES.get(&c) {
            Some(name) => {
                out.push_str(name);
                if chars.peek() == Some(&VARIATION_SELECTOR) {
                    chars.next();
                }
            }
            None => out.push(c),
        }
    }

    out
}

/// Unclamped emoji + emoticon sentiment for `text`
pub fn emoji_score(text: &str) -> f64 {
    let decoded = demojize(text);
    let mut score = 0.0;

    for entry in EMOJI_TABLE {
        let count = decoded.matches(entry.alias).count();
        if count > 0 {
            score += entry.weight * count as f64;
        }
    }

    for (spellings, weight) in EMOTICONS {
        if spellings.iter().any(|s| text.contains(s)) {
            score += weight;
        }
    }

    score
}
