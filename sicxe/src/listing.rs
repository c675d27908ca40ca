//! Assembly listing: one line per statement with its address and object code

use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListingLine {
    /// 1-based source line number
    pub line: usize,
    pub address: u32,
    pub source: String,
    /// Object code in hex, empty for directives that emit nothing
    pub object: String,
}

impl fmt::Display for ListingLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>5}  {:06X}  {:<40} {}", self.line, self.address, self.source, self.object)
    }
}

pub fn render_listing(lines: &[ListingLine]) -> String {
    let mut out = String::from("Line   Loc     Source                                   Object code\n");
    out.push_str(&"-".repeat(72));
    out.push('\n');
    for line in lines {
        out.push_str(line.to_string().trim_end());
        out.push('\n');
    }
    out
}
