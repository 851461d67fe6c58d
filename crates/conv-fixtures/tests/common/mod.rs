//! Shared helpers for reading generated fixture headers back.

use std::path::{Path, PathBuf};

/// Float blocks of a header, in header order.
pub const FLOAT_BLOCKS: [&str; 4] = ["conv_is", "conv_k1s", "conv_k2s", "conv_os"];

/// Parse the entries of the float block `name` back into values.
pub fn float_block(header: &str, name: &str) -> Vec<Vec<f32>> {
    let open = format!(" {name} = {{");
    let start = header
        .find(&open)
        .unwrap_or_else(|| panic!("block {name} not found"))
        + open.len();
    let end = start + header[start..].find("};").expect("unterminated block");
    let body = &header[start..end];
    if body.is_empty() {
        return Vec::new();
    }
    body.split(",\n")
        .map(|entry| {
            let inner = entry
                .trim()
                .strip_prefix('{')
                .and_then(|e| e.strip_suffix('}'))
                .unwrap_or_else(|| panic!("malformed entry in {name}: {entry:.40}"));
            inner
                .split(", ")
                .filter(|v| !v.is_empty())
                .map(|v| v.parse::<f32>().unwrap_or_else(|e| panic!("{v}: {e}")))
                .collect()
        })
        .collect()
}

/// Parse the module block back into the embedded texts.
pub fn module_block(header: &str) -> Vec<String> {
    let open = " conv_modules = {";
    let start = header.find(open).expect("module block not found") + open.len();
    let body = header[start..]
        .strip_suffix("};")
        .expect("module block must end the header");
    if body.is_empty() {
        return Vec::new();
    }
    body.trim_start_matches('\n')
        .strip_prefix("R\"#(")
        .and_then(|b| b.strip_suffix(")#\""))
        .expect("malformed module block")
        .split(")#\",\nR\"#(")
        .map(str::to_string)
        .collect()
}

/// Lay out one `module_NNNN.before_optimizations.txt` dump per combination.
pub fn write_dumps(root: &Path, count: usize) -> PathBuf {
    let dumps = root.join("conv_hlo_module");
    std::fs::create_dir_all(&dumps).unwrap();
    for i in 0..count {
        std::fs::write(
            dumps.join(format!("module_{i:04}.before_optimizations.txt")),
            hlo_text(i),
        )
        .unwrap();
    }
    dumps
}

/// Module text written for combination `i`.
pub fn hlo_text(i: usize) -> String {
    format!(
        "HloModule conv_{i}\n\nENTRY %conv_{i} {{\n  ROOT %r = f32[1] parameter(0)\n}}\n"
    )
}
