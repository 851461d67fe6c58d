//! Header emitter. Renders captured cases as C++ declarations.
//!
//! The header holds five parallel blocks; entry *i* of each block belongs
//! to combination *i*:
//!
//! ```text
//! std::vector<std::vector<float>> conv_is = {...};
//! std::vector<std::vector<float>> conv_k1s = {...};
//! std::vector<std::vector<float>> conv_k2s = {...};
//! std::vector<std::vector<float>> conv_os = {...};
//! std::vector<std::string> conv_modules = {R"#(...)#", ...};
//! ```

use crate::capture::CaseCapture;

/// Which of the five header blocks an entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Inputs,
    Kernel1,
    Kernel2,
    Outputs,
    Modules,
}

impl BlockKind {
    /// All blocks, in header order.
    pub const ALL: [Self; 5] = [
        Self::Inputs,
        Self::Kernel1,
        Self::Kernel2,
        Self::Outputs,
        Self::Modules,
    ];

    /// C++ variable name of the block.
    pub fn variable(self) -> &'static str {
        match self {
            Self::Inputs => "conv_is",
            Self::Kernel1 => "conv_k1s",
            Self::Kernel2 => "conv_k2s",
            Self::Outputs => "conv_os",
            Self::Modules => "conv_modules",
        }
    }

    /// Position of the block in the header.
    pub fn position(self) -> usize {
        match self {
            Self::Inputs => 0,
            Self::Kernel1 => 1,
            Self::Kernel2 => 2,
            Self::Outputs => 3,
            Self::Modules => 4,
        }
    }

    /// C++ type of the block.
    pub fn cpp_type(self) -> &'static str {
        match self {
            Self::Modules => "std::vector<std::string>",
            Self::Inputs | Self::Kernel1 | Self::Kernel2 | Self::Outputs => {
                "std::vector<std::vector<float>>"
            }
        }
    }
}

impl std::fmt::Display for BlockKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.variable())
    }
}

/// Format values as a brace-wrapped, comma-separated literal: `{a, b, c}`.
///
/// Each value uses the shortest representation that round-trips.
pub fn format_array<'a, I>(values: I) -> String
where
    I: IntoIterator<Item = &'a f32>,
{
    let body: Vec<String> = values.into_iter().map(f32::to_string).collect();
    format!("{{{}}}", body.join(", "))
}

/// Wrap module text in the raw string literal the header uses.
pub fn raw_string(text: &str) -> String {
    format!("R\"#({text})#\"")
}

/// One block: an append-only, ordered list of rendered entries.
#[derive(Debug, Clone)]
pub struct HeaderBlock {
    kind: BlockKind,
    entries: Vec<String>,
}

impl HeaderBlock {
    pub fn new(kind: BlockKind) -> Self {
        Self {
            kind,
            entries: Vec::new(),
        }
    }

    pub fn kind(&self) -> BlockKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn push(&mut self, entry: String) {
        self.entries.push(entry);
    }

    /// Render as `\n<type> <name> = {\n<e0>,\n<e1>};`.
    pub fn render(&self) -> String {
        let mut out = format!("\n{} {} = {{", self.kind.cpp_type(), self.kind.variable());
        let body: Vec<String> = self.entries.iter().map(|e| format!("\n{e}")).collect();
        out.push_str(&body.join(","));
        out.push_str("};");
        out
    }
}

/// All five blocks of a fixture header.
#[derive(Debug, Clone)]
pub struct FixtureHeader {
    blocks: [HeaderBlock; 5],
}

impl FixtureHeader {
    pub fn new() -> Self {
        Self {
            blocks: BlockKind::ALL.map(HeaderBlock::new),
        }
    }

    /// Append one captured case to every block.
    pub fn push_case(&mut self, case: &CaseCapture) {
        let [inputs, kernel1, kernel2, outputs, modules] = &mut self.blocks;
        inputs.push(format_array(&case.input));
        kernel1.push(format_array(&case.kernel1));
        kernel2.push(format_array(&case.kernel2));
        outputs.push(format_array(&case.output));
        modules.push(raw_string(&case.module_text));
    }

    /// Number of cases pushed so far.
    pub fn case_count(&self) -> usize {
        self.blocks[0].len()
    }

    pub fn block(&self, kind: BlockKind) -> &HeaderBlock {
        &self.blocks[kind.position()]
    }

    /// Full header text: a leading newline followed by the five blocks.
    pub fn render(&self) -> String {
        let mut out = String::from("\n");
        for block in &self.blocks {
            out.push_str(&block.render());
        }
        out
    }
}

impl Default for FixtureHeader {
    fn default() -> Self {
        Self::new()
    }
}
