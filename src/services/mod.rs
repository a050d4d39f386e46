pub mod lectures;
pub use lectures::*;

pub mod study;
pub use study::*;

/// Boundary authorization check. The processing pipeline never sees
/// this; callers verify the shared access code once, at the entry
/// point, before any operation runs. No configured code means the gate
/// is open.
pub struct AccessGate {
    access_code: Option<String>,
}

impl AccessGate {
    pub fn new(access_code: Option<String>) -> Self {
        Self { access_code }
    }

    pub fn verify(&self, presented: Option<&str>) -> bool {
        match &self.access_code {
            None => true,
            Some(expected) => presented
                .map(|code| constant_time_eq(expected, code))
                .unwrap_or(false),
        }
    }
}

fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.bytes()
        .zip(b.bytes())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y))
        == 0
}
