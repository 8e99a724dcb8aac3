use std::{fs, path::Path};

use alien_defence_core::Position;
use anyhow::Context as _;

/// Renders one `x y` line per tower in placement order.
pub(crate) fn render(towers: &[Position]) -> String {
    towers
        .iter()
        .map(|tower| format!("{} {}\n", tower.x(), tower.y()))
        .collect()
}

/// Writes the tower list to `path`, replacing any previous file.
pub(crate) fn write(path: &Path, towers: &[Position]) -> anyhow::Result<()> {
    fs::write(path, render(towers))
        .with_context(|| format!("failed to write tower list {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn towers_render_one_per_line_in_order() {
        let towers = [
            Position::new(3, 0),
            Position::new(0, 12),
            Position::new(1, 1),
        ];
        assert_eq!(render(&towers), "3 0\n0 12\n1 1\n");
    }

    #[test]
    fn no_towers_renders_an_empty_file() {
        assert_eq!(render(&[]), "");
    }
}
