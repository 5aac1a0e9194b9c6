// DSR
// Copyright (c) 2026 The Project DSR Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The `text` module implements the DSR character set used by the 8-byte station-name field.
//!
//! The set is a Latin-1 superset with Eastern European accents and a handful of currency and
//! arrow glyphs. Codes `0xE0..=0xFF` and a few scattered positions are unassigned.

use std::collections::HashMap;

use lazy_static::lazy_static;

/// Length of the station-name field, in characters.
pub const NAME_LEN: usize = 8;

/// The DSR character set. Unassigned codes hold an empty string.
const CHARSET: [&str; 256] = [
    "Ã", "Å", "Æ", "Œ", "ŷ", "Ý", "Õ", "Ø", "Þ", "Ŋ", "Ŕ", "Ć", "Ś", "Ź", "Ŧ", "ð",
    "ã", "å", "æ", "œ", "ŵ", "ý", "õ", "ø", "þ", "ŋ", "ŕ", "ć", "ś", "ź", "ŧ", "",
    " ", "!", "\"", "#", "¤", "%", "&", "'", "(", ")", "*", "+", ",", "-", ".", "/",
    "0", "1", "2", "3", "4", "5", "6", "7", "8", "9", ":", ";", "<", "=", ">", "?",
    "@", "A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L", "M", "N", "O",
    "P", "Q", "R", "S", "T", "U", "V", "W", "X", "Y", "Z", "[", "\\", "]", "―", "_",
    "‖", "a", "b", "c", "d", "e", "f", "g", "h", "i", "j", "k", "l", "m", "n", "o",
    "p", "q", "r", "s", "t", "u", "v", "w", "x", "y", "z", "{", "|", "}", "¯", "",
    "á", "à", "é", "è", "í", "ì", "ó", "ò", "ú", "ù", "Ñ", "Ç", "Ş", "β", "¡", "Ĳ",
    "â", "ä", "ê", "ë", "î", "ï", "ô", "ö", "û", "ü", "ñ", "ç", "ş", "ǧ", "ı", "ĳ",
    "ª", "α", "©", "‰", "Ǧ", "ě", "ň", "ő", "π", "₠", "£", "$", "←", "↑", "→", "↓",
    "º", "¹", "²", "³", "±", "İ", "ń", "ű", "µ", "¿", "÷", "°", "¼", "½", "¾", "§",
    "Á", "À", "É", "È", "Í", "Ì", "Ó", "Ò", "Ú", "Ù", "Ř", "Č", "Š", "Ž", "Ð", "Ŀ",
    "Â", "Ä", "Ê", "Ë", "Î", "Ï", "Ô", "Ö", "Û", "Ü", "ř", "č", "š", "ž", "đ", "ŀ",
    "", "", "", "", "", "", "", "", "", "", "", "", "", "", "", "",
    "", "", "", "", "", "", "", "", "", "", "", "", "", "", "", "",
];

lazy_static! {
    /// Reverse map from Unicode code point to DSR code, built once at startup.
    static ref CHARSET_MAP: HashMap<char, u8> = {
        let mut map = HashMap::new();
        for (code, s) in CHARSET.iter().enumerate() {
            if let Some(c) = s.chars().next() {
                map.entry(c).or_insert(code as u8);
            }
        }
        map
    };
}

/// Encodes a station name into the 8-byte DSR representation.
///
/// The name is mapped code-point-wise; unmapped code points become `0x20` (space), and names
/// shorter than eight characters are padded with spaces. Characters beyond the eighth are
/// ignored.
pub fn encode_ps(name: &str) -> [u8; NAME_LEN] {
    let mut out = [0x20u8; NAME_LEN];

    for (dst, c) in out.iter_mut().zip(name.chars()) {
        *dst = CHARSET_MAP.get(&c).copied().unwrap_or(0x20);
    }

    out
}

/// Decodes an 8-byte DSR station name. Unassigned codes decode as `"?"`.
pub fn decode_ps(name: &[u8; NAME_LEN]) -> String {
    let mut out = String::new();

    for &code in name {
        let s = CHARSET[code as usize];
        out.push_str(if s.is_empty() { "?" } else { s });
    }

    out
}

#[cfg(test)]
mod tests {
    use super::{decode_ps, encode_ps};

    #[test]
    fn verify_ascii_round_trip() {
        let ps = encode_ps("DSR TEST");

        assert_eq!(ps, *b"DSR TEST");
        assert_eq!(decode_ps(&ps), "DSR TEST");
    }

    #[test]
    fn verify_accented_round_trip() {
        let ps = encode_ps("Ĳsselmeer");

        // The ninth character is dropped; the ligature lives at 0x8F.
        assert_eq!(ps[0], 0x8F);
        assert_eq!(decode_ps(&ps), "Ĳsselmee");
    }

    #[test]
    fn verify_padding_and_unmapped() {
        // Short names pad with spaces; code points outside the set become spaces.
        let ps = encode_ps("A💡B");

        assert_eq!(ps, [b'A', 0x20, b'B', 0x20, 0x20, 0x20, 0x20, 0x20]);
    }

    #[test]
    fn verify_currency_positions() {
        // '¤' displaced '$' from its ASCII position; '$' lives in the symbols row.
        assert_eq!(encode_ps("¤")[0], 0x24);
        assert_eq!(encode_ps("$")[0], 0xAB);
    }

    #[test]
    fn verify_unassigned_decodes_as_question_mark() {
        assert_eq!(decode_ps(&[0xE0, 0xFF, 0x1F, 0x7F, b'O', b'K', 0x20, 0x20]), "????OK  ");
    }
}
