use serde::{Deserialize, Serialize};

/// One position of a seven-segment display.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Digit {
    Num(u8),
    Hyphen,
}

/// Three-digit counter used for the remaining mines and the elapsed seconds.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentDisplay {
    value: i32,
}

impl SegmentDisplay {
    pub const fn new(value: i32) -> Self {
        Self { value }
    }

    pub const fn get(&self) -> i32 {
        self.value
    }

    pub fn set(&mut self, value: i32) {
        self.value = value;
    }

    /// Sets the value and reports whether it differed from the previous one.
    pub fn try_set(&mut self, value: i32) -> bool {
        if self.value == value {
            return false;
        }
        self.set(value);
        true
    }

    /// Digits as shown: above 999 saturates at `999`, negatives lead with a hyphen and saturate at `-99`.
    pub const fn digits(&self) -> [Digit; 3] {
        use Digit::*;

        let v = self.value;
        if v > 999 {
            return [Num(9); 3];
        }
        if v < -99 {
            return [Hyphen, Num(9), Num(9)];
        }
        let magnitude = v.unsigned_abs();
        let tens = Num(((magnitude / 10) % 10) as u8);
        let ones = Num((magnitude % 10) as u8);
        if v < 0 {
            [Hyphen, tens, ones]
        } else {
            [Num((magnitude / 100) as u8), tens, ones]
        }
    }
}
