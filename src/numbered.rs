//! Numbered deals: a deal number always produces the same deck.
//!
//! Numbers follow the PySolFC conventions for choosing a generator:
//!   * `ms<N>` numbers, and plain numbers below 32000, drive a 31-bit
//!     linear congruential generator;
//!   * larger plain numbers (of any size) seed an MT19937 generator from
//!     the number's 32-bit little-endian words.
//!
//! Cards are created suit-major (clubs, spades, hearts, diamonds) and
//! rank-minor, then shuffled with Fisher-Yates. The end of the shuffled
//! list is the top of the deck, which is where `Layout::deal` takes cards
//! from.

use core::fmt;
use core::str::FromStr;

use num_bigint::BigUint;
use num_traits::{One, ToPrimitive, Zero};

use crate::card::{CARDS_PER_DECK, Card, Rank, Suit};

/// Plain numbers below this use the LCG instead of MT19937.
const LCG_THRESHOLD: u32 = 32_000;

/// Creation order of suits for numbered deals.
const CREATION_SUITS: [Suit; 4] = [Suit::Clubs, Suit::Spades, Suit::Hearts, Suit::Diamonds];

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum DealNumber {
    /// `ms<N>` form, 1..=MsLcg::MAX_SEED.
    Ms(u64),
    /// Any positive integer.
    Plain(BigUint),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DealNumberError {
    Empty,
    InvalidDigits(String),
    OutOfRange(String),
}

impl fmt::Display for DealNumberError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DealNumberError::Empty => f.write_str("empty deal number"),
            DealNumberError::InvalidDigits(s) => {
                write!(f, "deal number {s:?} is not a number or ms<number>")
            }
            DealNumberError::OutOfRange(s) => write!(f, "deal number {s:?} is out of range"),
        }
    }
}

impl std::error::Error for DealNumberError {}

impl FromStr for DealNumber {
    type Err = DealNumberError;

    /// Accepts "12345", "ms12345" and arbitrarily large integers. Spaces
    /// and `# - _ . ,` are ignored, as is a trailing `L`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let trimmed = trimmed.strip_suffix('L').unwrap_or(trimmed);
        let cleaned: String = trimmed
            .chars()
            .filter(|ch| !(ch.is_whitespace() || matches!(ch, '#' | '-' | '_' | '.' | ',')))
            .map(|ch| ch.to_ascii_lowercase())
            .collect();
        if cleaned.is_empty() {
            return Err(DealNumberError::Empty);
        }

        let all_digits = |t: &str| !t.is_empty() && t.chars().all(|c| c.is_ascii_digit());

        if let Some(rest) = cleaned.strip_prefix("ms") {
            if !all_digits(rest) {
                return Err(DealNumberError::InvalidDigits(s.to_string()));
            }
            let n: u64 = rest
                .parse()
                .map_err(|_| DealNumberError::OutOfRange(s.to_string()))?;
            if !(1..=MsLcg::MAX_SEED).contains(&n) {
                return Err(DealNumberError::OutOfRange(s.to_string()));
            }
            return Ok(DealNumber::Ms(n));
        }

        if !all_digits(&cleaned) {
            return Err(DealNumberError::InvalidDigits(s.to_string()));
        }
        let n = BigUint::parse_bytes(cleaned.as_bytes(), 10)
            .ok_or_else(|| DealNumberError::InvalidDigits(s.to_string()))?;
        if n.is_zero() {
            return Err(DealNumberError::OutOfRange(s.to_string()));
        }
        Ok(DealNumber::Plain(n))
    }
}

impl fmt::Display for DealNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DealNumber::Ms(n) => write!(f, "ms{n}"),
            DealNumber::Plain(n) => write!(f, "{n}"),
        }
    }
}

impl DealNumber {
    /// The number of the next deal. `ms` numbers wrap back to 1.
    pub fn successor(&self) -> DealNumber {
        match self {
            DealNumber::Ms(n) if *n >= MsLcg::MAX_SEED => DealNumber::Ms(1),
            DealNumber::Ms(n) => DealNumber::Ms(n + 1),
            DealNumber::Plain(n) => DealNumber::Plain(n + BigUint::one()),
        }
    }

    /// The deck for this number, top of deck last.
    pub fn deck(&self) -> Vec<Card> {
        let mut cards: Vec<Card> = CREATION_SUITS
            .iter()
            .flat_map(|&suit| Rank::ALL.iter().map(move |&rank| Card::new(suit, rank)))
            .collect();
        debug_assert_eq!(cards.len(), CARDS_PER_DECK as usize);

        match self {
            DealNumber::Ms(n) => MsLcg::new(*n).shuffle(&mut cards),
            DealNumber::Plain(n) => match n.to_u64().filter(|&v| v < LCG_THRESHOLD as u64) {
                Some(small) => MsLcg::new(small).shuffle(&mut cards),
                None => Mt19937::from_big(n).shuffle(&mut cards),
            },
        }
        cards
    }
}

/// Fisher-Yates driven by a generator that can pick an index in `0..=upper`.
trait PickIndex {
    fn pick_inclusive(&mut self, upper: usize) -> usize;

    fn shuffle<T>(&mut self, seq: &mut [T]) {
        for n in (1..seq.len()).rev() {
            let j = self.pick_inclusive(n);
            seq.swap(n, j);
        }
    }
}

/// 31-bit (33-bit state) linear congruential generator.
struct MsLcg {
    seed: u64,
    state: u64,
}

impl MsLcg {
    const MAX_SEED: u64 = (1u64 << 33) - 1;

    fn new(seed: u64) -> Self {
        let state = if seed < 0x1_0000_0000 {
            seed
        } else {
            seed - 0x1_0000_0000
        };
        MsLcg { seed, state }
    }

    fn step(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(214_013)
            .wrapping_add(2_531_011)
            & Self::MAX_SEED;
        self.state >> 16
    }

    fn next_value(&mut self) -> usize {
        if self.seed < 0x1_0000_0000 {
            let r = (self.step() & 0x7fff) as usize;
            if self.seed < 0x8000_0000 { r } else { r | 0x8000 }
        } else {
            (self.step() & 0xffff) as usize + 1
        }
    }
}

impl PickIndex for MsLcg {
    fn pick_inclusive(&mut self, upper: usize) -> usize {
        self.next_value() % (upper + 1)
    }
}

/// MT19937 with CPython's seeding from a big integer and its 53-bit
/// `random()` double.
const MT_N: usize = 624;
const MT_M: usize = 397;

struct Mt19937 {
    mt: [u32; MT_N],
    index: usize,
}

impl Mt19937 {
    fn from_big(seed: &BigUint) -> Self {
        let mut key = seed.to_u32_digits();
        if key.is_empty() {
            key.push(0);
        }
        let mut r = Mt19937 {
            mt: [0; MT_N],
            index: MT_N,
        };
        r.init_by_array(&key);
        r
    }

    fn init_genrand(&mut self, s: u32) {
        self.mt[0] = s;
        for i in 1..MT_N {
            let prev = self.mt[i - 1];
            self.mt[i] = 1_812_433_253u32
                .wrapping_mul(prev ^ (prev >> 30))
                .wrapping_add(i as u32);
        }
        self.index = MT_N;
    }

    fn init_by_array(&mut self, key: &[u32]) {
        self.init_genrand(19_650_218);
        let mut i = 1usize;
        let mut j = 0usize;

        for _ in 0..MT_N.max(key.len()) {
            let prev = self.mt[i - 1];
            self.mt[i] = (self.mt[i] ^ 1_664_525u32.wrapping_mul(prev ^ (prev >> 30)))
                .wrapping_add(key[j])
                .wrapping_add(j as u32);
            i += 1;
            j += 1;
            if i >= MT_N {
                self.mt[0] = self.mt[MT_N - 1];
                i = 1;
            }
            if j >= key.len() {
                j = 0;
            }
        }

        for _ in 0..MT_N - 1 {
            let prev = self.mt[i - 1];
            self.mt[i] = (self.mt[i] ^ 1_566_083_941u32.wrapping_mul(prev ^ (prev >> 30)))
                .wrapping_sub(i as u32);
            i += 1;
            if i >= MT_N {
                self.mt[0] = self.mt[MT_N - 1];
                i = 1;
            }
        }

        self.mt[0] = 0x8000_0000;
        self.index = MT_N;
    }

    fn twist(&mut self) {
        const MATRIX_A: u32 = 0x9908_b0df;
        for i in 0..MT_N {
            let y = (self.mt[i] & 0x8000_0000) | (self.mt[(i + 1) % MT_N] & 0x7fff_ffff);
            let mut next = y >> 1;
            if y & 1 != 0 {
                next ^= MATRIX_A;
            }
            self.mt[i] = self.mt[(i + MT_M) % MT_N] ^ next;
        }
        self.index = 0;
    }

    fn next_u32(&mut self) -> u32 {
        if self.index >= MT_N {
            self.twist();
        }
        let mut y = self.mt[self.index];
        self.index += 1;
        y ^= y >> 11;
        y ^= (y << 7) & 0x9d2c_5680;
        y ^= (y << 15) & 0xefc6_0000;
        y ^= y >> 18;
        y
    }

    /// Uniform double in [0, 1) built from 27 + 26 random bits.
    fn next_f64(&mut self) -> f64 {
        let a = (self.next_u32() >> 5) as u64;
        let b = (self.next_u32() >> 6) as u64;
        ((a << 26) + b) as f64 / (1u64 << 53) as f64
    }
}

impl PickIndex for Mt19937 {
    fn pick_inclusive(&mut self, upper: usize) -> usize {
        (self.next_f64() * (upper + 1) as f64) as usize
    }
}
