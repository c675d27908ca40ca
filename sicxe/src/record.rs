//! Object program records: H, T, M and E

/// Maximum payload of one text record, in bytes.
pub const MAX_TEXT_BYTES: usize = 30;

pub fn header_record(name: &str, start: u32, length: u32) -> String {
    let name: String = name.chars().take(6).collect();
    format!("H{:<6}{:06X}{:06X}", name, start, length)
}

pub fn text_record(start: u32, payload: &[u8]) -> String {
    let mut out = format!("T{:06X}{:02X}", start, payload.len());
    out.push_str(&hex_string(payload));
    out
}

pub fn modification_record(address: u32, half_bytes: u8) -> String {
    format!("M{:06X}{:02X}", address, half_bytes)
}

pub fn end_record(address: u32) -> String {
    format!("E{:06X}", address)
}

/// Upper-case hex, two digits per byte.
pub fn hex_string(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02X}", b)).collect()
}

/// A pending relocation: `half_bytes` nibbles starting at `address`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Modification {
    pub address: u32,
    pub half_bytes: u8,
}

impl Modification {
    pub fn render(&self) -> String {
        modification_record(self.address, self.half_bytes)
    }
}

/// Accumulates contiguous object bytes for one text record.
#[derive(Debug, Default)]
pub struct TextRecordBuffer {
    start: u32,
    bytes: Vec<u8>,
}

impl TextRecordBuffer {
    pub fn new(start: u32) -> Self {
        Self {
            start,
            bytes: Vec::with_capacity(MAX_TEXT_BYTES),
        }
    }

    pub fn start(&self) -> u32 {
        self.start
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Whether `len` bytes at `addr` still fit within the record's span.
    pub fn fits(&self, addr: u32, len: usize) -> bool {
        if self.bytes.is_empty() {
            return len <= MAX_TEXT_BYTES;
        }
        (addr as u64 + len as u64).saturating_sub(self.start as u64) <= MAX_TEXT_BYTES as u64
    }

    /// Append bytes located at `addr`. An empty buffer adopts `addr` as its start.
    pub fn push(&mut self, addr: u32, bytes: &[u8]) {
        if self.bytes.is_empty() {
            self.start = addr;
        }
        self.bytes.extend_from_slice(bytes);
    }

    /// Render and clear. Empty buffers produce no record.
    pub fn flush(&mut self) -> Option<String> {
        if self.bytes.is_empty() {
            return None;
        }
        let record = text_record(self.start, &self.bytes);
        self.bytes.clear();
        Some(record)
    }
}
