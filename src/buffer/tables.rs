//! Character-class tables and the state transition matrix.
//!
//! The automaton is the classic JSON-checker machine: a 256-way character
//! classifier (folded to 128 entries plus a catch-all for non-ASCII) feeding
//! a `(state, class)` transition matrix. Negative values below `__` are
//! action codes returned to the decoder; `__` itself is the error sentinel.

/// DFA state or action code.
pub(crate) type State = i8;
/// Character class index.
pub(crate) type Class = i8;

/// Error sentinel shared by the class tables and the transition matrix.
pub(crate) const __: i8 = -1;

// Action codes. The matrix yields one of these when the cursor sits on a
// structural byte that ends the current token.
pub(crate) const CN: State = -2; // ':'
pub(crate) const CA: State = -3; // ','
pub(crate) const QT: State = -4; // closing string border
pub(crate) const AO: State = -5; // '['
pub(crate) const OO: State = -6; // '{'
pub(crate) const AC: State = -7; // ']'
pub(crate) const OC: State = -8; // '}'
pub(crate) const OE: State = -9; // '}' closing an empty object

// Automaton states.
pub(crate) const GO: State = 0; // start
pub(crate) const OK: State = 1; // ok
pub(crate) const OB: State = 2; // object
pub(crate) const KE: State = 3; // key
pub(crate) const CO: State = 4; // colon
pub(crate) const VA: State = 5; // value
pub(crate) const AR: State = 6; // array
pub(crate) const ST: State = 7; // string
pub(crate) const ES: State = 8; // escape
pub(crate) const U1: State = 9; // \u1
pub(crate) const U2: State = 10; // \u2
pub(crate) const U3: State = 11; // \u3
pub(crate) const U4: State = 12; // \u4
pub(crate) const MI: State = 13; // minus
pub(crate) const ZE: State = 14; // zero
pub(crate) const IN: State = 15; // integer
pub(crate) const FR: State = 16; // fraction
pub(crate) const E1: State = 17; // e
pub(crate) const E2: State = 18; // e sign
pub(crate) const E3: State = 19; // exponent
pub(crate) const T1: State = 20; // tr
pub(crate) const T2: State = 21; // tru
pub(crate) const T3: State = 22; // true
pub(crate) const F1: State = 23; // fa
pub(crate) const F2: State = 24; // fal
pub(crate) const F3: State = 25; // fals
pub(crate) const F4: State = 26; // false
pub(crate) const N1: State = 27; // nu
pub(crate) const N2: State = 28; // nul
pub(crate) const N3: State = 29; // null

pub(crate) const STATE_COUNT: usize = 30;

// Character classes.
pub(crate) const C_SPACE: Class = 0; // space
pub(crate) const C_WHITE: Class = 1; // other whitespace
pub(crate) const C_LCURB: Class = 2; // {
pub(crate) const C_RCURB: Class = 3; // }
pub(crate) const C_LSQRB: Class = 4; // [
pub(crate) const C_RSQRB: Class = 5; // ]
pub(crate) const C_COLON: Class = 6; // :
pub(crate) const C_COMMA: Class = 7; // ,
pub(crate) const C_QUOTE: Class = 8; // string border
pub(crate) const C_BACKS: Class = 9; // \
pub(crate) const C_SLASH: Class = 10; // /
pub(crate) const C_PLUS: Class = 11; // +
pub(crate) const C_MINUS: Class = 12; // -
pub(crate) const C_POINT: Class = 13; // .
pub(crate) const C_ZERO: Class = 14; // 0
pub(crate) const C_DIGIT: Class = 15; // 1-9
pub(crate) const C_LOW_A: Class = 16; // a
pub(crate) const C_LOW_B: Class = 17; // b
pub(crate) const C_LOW_C: Class = 18; // c
pub(crate) const C_LOW_D: Class = 19; // d
pub(crate) const C_LOW_E: Class = 20; // e
pub(crate) const C_LOW_F: Class = 21; // f
pub(crate) const C_LOW_L: Class = 22; // l
pub(crate) const C_LOW_N: Class = 23; // n
pub(crate) const C_LOW_R: Class = 24; // r
pub(crate) const C_LOW_S: Class = 25; // s
pub(crate) const C_LOW_T: Class = 26; // t
pub(crate) const C_LOW_U: Class = 27; // u
pub(crate) const C_ABCDF: Class = 28; // A-D, F
pub(crate) const C_E: Class = 29; // E
pub(crate) const C_ETC: Class = 30; // everything else

pub(crate) const CLASS_COUNT: usize = 31;

/// Maps the 128 ASCII bytes to character classes for the default
/// (double-quoted) mode. Non-whitespace control characters are errors;
/// bytes at or above 0x80 are classified by the caller as [`C_ETC`].
pub(crate) const ASCII_CLASSES: [Class; 128] = [
    __, __, __, __, __, __, __, __,
    __, C_WHITE, C_WHITE, __, __, C_WHITE, __, __,
    __, __, __, __, __, __, __, __,
    __, __, __, __, __, __, __, __,

    C_SPACE, C_ETC, C_QUOTE, C_ETC, C_ETC, C_ETC, C_ETC, C_ETC,
    C_ETC, C_ETC, C_ETC, C_PLUS, C_COMMA, C_MINUS, C_POINT, C_SLASH,
    C_ZERO, C_DIGIT, C_DIGIT, C_DIGIT, C_DIGIT, C_DIGIT, C_DIGIT, C_DIGIT,
    C_DIGIT, C_DIGIT, C_COLON, C_ETC, C_ETC, C_ETC, C_ETC, C_ETC,

    C_ETC, C_ABCDF, C_ABCDF, C_ABCDF, C_ABCDF, C_E, C_ABCDF, C_ETC,
    C_ETC, C_ETC, C_ETC, C_ETC, C_ETC, C_ETC, C_ETC, C_ETC,
    C_ETC, C_ETC, C_ETC, C_ETC, C_ETC, C_ETC, C_ETC, C_ETC,
    C_ETC, C_ETC, C_ETC, C_LSQRB, C_BACKS, C_RSQRB, C_ETC, C_ETC,

    C_ETC, C_LOW_A, C_LOW_B, C_LOW_C, C_LOW_D, C_LOW_E, C_LOW_F, C_ETC,
    C_ETC, C_ETC, C_ETC, C_ETC, C_LOW_L, C_ETC, C_LOW_N, C_ETC,
    C_ETC, C_ETC, C_LOW_R, C_LOW_S, C_LOW_T, C_LOW_U, C_ETC, C_ETC,
    C_ETC, C_ETC, C_ETC, C_LCURB, C_ETC, C_RCURB, C_ETC, C_ETC,
];

/// Same classifier with the single quote as the string border, used when
/// tokenizing path fragments. The double quote becomes an ordinary byte.
pub(crate) const QUOTE_ASCII_CLASSES: [Class; 128] = [
    __, __, __, __, __, __, __, __,
    __, C_WHITE, C_WHITE, __, __, C_WHITE, __, __,
    __, __, __, __, __, __, __, __,
    __, __, __, __, __, __, __, __,

    C_SPACE, C_ETC, C_ETC, C_ETC, C_ETC, C_ETC, C_ETC, C_QUOTE,
    C_ETC, C_ETC, C_ETC, C_PLUS, C_COMMA, C_MINUS, C_POINT, C_SLASH,
    C_ZERO, C_DIGIT, C_DIGIT, C_DIGIT, C_DIGIT, C_DIGIT, C_DIGIT, C_DIGIT,
    C_DIGIT, C_DIGIT, C_COLON, C_ETC, C_ETC, C_ETC, C_ETC, C_ETC,

    C_ETC, C_ABCDF, C_ABCDF, C_ABCDF, C_ABCDF, C_E, C_ABCDF, C_ETC,
    C_ETC, C_ETC, C_ETC, C_ETC, C_ETC, C_ETC, C_ETC, C_ETC,
    C_ETC, C_ETC, C_ETC, C_ETC, C_ETC, C_ETC, C_ETC, C_ETC,
    C_ETC, C_ETC, C_ETC, C_LSQRB, C_BACKS, C_RSQRB, C_ETC, C_ETC,

    C_ETC, C_LOW_A, C_LOW_B, C_LOW_C, C_LOW_D, C_LOW_E, C_LOW_F, C_ETC,
    C_ETC, C_ETC, C_ETC, C_ETC, C_LOW_L, C_ETC, C_LOW_N, C_ETC,
    C_ETC, C_ETC, C_LOW_R, C_LOW_S, C_LOW_T, C_LOW_U, C_ETC, C_ETC,
    C_ETC, C_ETC, C_ETC, C_LCURB, C_ETC, C_RCURB, C_ETC, C_ETC,
];

/// The transition matrix. Indexed by `(state, class)`; a value `>= GO` is the
/// next state, `__` is a fatal token error, and anything below `__` is an
/// action code handed back to the decoder.
#[rustfmt::skip]
pub(crate) const STATE_TRANSITION_TABLE: [[State; CLASS_COUNT]; STATE_COUNT] = [
/*             sp  ws   {   }   [   ]   :   ,   "   \   /   +   -   .   0  1-9  a   b   c   d   e   f   l   n   r   s   t   u  ABDF  E  etc */
/* start GO */ [GO, GO, OO, __, AO, __, __, __, ST, __, __, __, MI, __, ZE, IN, __, __, __, __, __, F1, __, N1, __, __, T1, __, __, __, __],
/* ok    OK */ [OK, OK, __, OC, __, AC, __, CA, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __],
/* objct OB */ [OB, OB, __, OE, __, __, __, __, ST, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __],
/* key   KE */ [KE, KE, __, __, __, __, __, __, ST, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __],
/* colon CO */ [CO, CO, __, __, __, __, CN, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __],
/* value VA */ [VA, VA, OO, __, AO, __, __, __, ST, __, __, __, MI, __, ZE, IN, __, __, __, __, __, F1, __, N1, __, __, T1, __, __, __, __],
/* array AR */ [AR, AR, OO, __, AO, AC, __, __, ST, __, __, __, MI, __, ZE, IN, __, __, __, __, __, F1, __, N1, __, __, T1, __, __, __, __],
/* strng ST */ [ST, __, ST, ST, ST, ST, ST, ST, QT, ES, ST, ST, ST, ST, ST, ST, ST, ST, ST, ST, ST, ST, ST, ST, ST, ST, ST, ST, ST, ST, ST],
/* escap ES */ [__, __, __, __, __, __, __, __, ST, ST, ST, __, __, __, __, __, __, ST, __, __, __, ST, __, ST, ST, __, ST, U1, __, __, __],
/* u1    U1 */ [__, __, __, __, __, __, __, __, __, __, __, __, __, __, U2, U2, U2, U2, U2, U2, U2, U2, __, __, __, __, __, __, U2, U2, __],
/* u2    U2 */ [__, __, __, __, __, __, __, __, __, __, __, __, __, __, U3, U3, U3, U3, U3, U3, U3, U3, __, __, __, __, __, __, U3, U3, __],
/* u3    U3 */ [__, __, __, __, __, __, __, __, __, __, __, __, __, __, U4, U4, U4, U4, U4, U4, U4, U4, __, __, __, __, __, __, U4, U4, __],
/* u4    U4 */ [__, __, __, __, __, __, __, __, __, __, __, __, __, __, ST, ST, ST, ST, ST, ST, ST, ST, __, __, __, __, __, __, ST, ST, __],
/* minus MI */ [__, __, __, __, __, __, __, __, __, __, __, __, __, __, ZE, IN, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __],
/* zero  ZE */ [OK, OK, __, OC, __, AC, __, CA, __, __, __, __, __, FR, __, __, __, __, __, __, E1, __, __, __, __, __, __, __, __, E1, __],
/* int   IN */ [OK, OK, __, OC, __, AC, __, CA, __, __, __, __, __, FR, IN, IN, __, __, __, __, E1, __, __, __, __, __, __, __, __, E1, __],
/* frac  FR */ [OK, OK, __, OC, __, AC, __, CA, __, __, __, __, __, __, FR, FR, __, __, __, __, E1, __, __, __, __, __, __, __, __, E1, __],
/* e     E1 */ [__, __, __, __, __, __, __, __, __, __, __, E2, E2, __, E3, E3, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __],
/* ex    E2 */ [__, __, __, __, __, __, __, __, __, __, __, __, __, __, E3, E3, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __],
/* exp   E3 */ [OK, OK, __, OC, __, AC, __, CA, __, __, __, __, __, __, E3, E3, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __],
/* tr    T1 */ [__, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, T2, __, __, __, __, __, __],
/* tru   T2 */ [__, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, T3, __, __, __],
/* true  T3 */ [__, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, OK, __, __, __, __, __, __, __, __, __, __],
/* fa    F1 */ [__, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, F2, __, __, __, __, __, __, __, __, __, __, __, __, __, __],
/* fal   F2 */ [__, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, F3, __, __, __, __, __, __, __, __],
/* fals  F3 */ [__, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, F4, __, __, __, __, __],
/* false F4 */ [__, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, OK, __, __, __, __, __, __, __, __, __, __],
/* nu    N1 */ [__, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, N2, __, __, __],
/* nul   N2 */ [__, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, N3, __, __, __, __, __, __, __, __],
/* null  N3 */ [__, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, OK, __, __, __, __, __, __, __, __],
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifier_covers_structural_bytes() {
        assert_eq!(ASCII_CLASSES[b'{' as usize], C_LCURB);
        assert_eq!(ASCII_CLASSES[b'"' as usize], C_QUOTE);
        assert_eq!(ASCII_CLASSES[b'\'' as usize], C_ETC);
        assert_eq!(QUOTE_ASCII_CLASSES[b'\'' as usize], C_QUOTE);
        assert_eq!(QUOTE_ASCII_CLASSES[b'"' as usize], C_ETC);
        assert_eq!(ASCII_CLASSES[b'7' as usize], C_DIGIT);
        assert_eq!(ASCII_CLASSES[0x01], __);
    }

    #[test]
    fn literal_words_reach_ok() {
        let walk = |start: State, word: &[u8]| {
            let mut state = start;
            for &b in word {
                let class = ASCII_CLASSES[b as usize];
                state = STATE_TRANSITION_TABLE[state as usize][class as usize];
            }
            state
        };
        assert_eq!(walk(T1, b"rue"), OK);
        assert_eq!(walk(F1, b"alse"), OK);
        assert_eq!(walk(N1, b"ull"), OK);
    }

    #[test]
    fn number_states_accept_exponent_forms() {
        let mut state = MI;
        for &b in b"12.5e-3" {
            let class = ASCII_CLASSES[b as usize];
            state = STATE_TRANSITION_TABLE[state as usize][class as usize];
        }
        assert_eq!(state, E3);
    }
}
