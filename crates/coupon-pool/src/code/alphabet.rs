/// Number of Hangul initial consonants (choseong).
const INITIALS: u32 = 19;
/// Number of Hangul vowels (jungseong).
const MEDIALS: u32 = 21;
/// Number of final-consonant slots per initial/medial pair, including "none".
const FINALS: u32 = 28;
/// First precomposed syllable, `가`.
const SYLLABLE_BASE: u32 = 0xAC00;

const SYLLABLES: usize = (INITIALS * MEDIALS) as usize;

/// Number of symbols a coupon code body is drawn from.
pub const ALPHABET_LEN: usize = SYLLABLES + 10;

/// Symbols a coupon code body is drawn from: the 399 open Hangul syllables
/// (every initial/vowel pair without a final consonant, `가` through `히`)
/// followed by the ASCII digits.
pub const ALPHABET: [char; ALPHABET_LEN] = build_alphabet();

const fn build_alphabet() -> [char; ALPHABET_LEN] {
    let mut table = ['0'; ALPHABET_LEN];
    let mut i = 0;
    while i < SYLLABLES {
        let initial = i as u32 / MEDIALS;
        let medial = i as u32 % MEDIALS;
        let scalar = SYLLABLE_BASE + initial * MEDIALS * FINALS + medial * FINALS;
        table[i] = match char::from_u32(scalar) {
            Some(c) => c,
            None => panic!("Hangul syllable block is contiguous"),
        };
        i += 1;
    }
    let mut digit = 0;
    while digit < 10 {
        table[SYLLABLES + digit] = (b'0' + digit as u8) as char;
        digit += 1;
    }
    table
}
