use contracts::shared::charts::SECONDARY_COLORS;

pub const CANCELED_COLOR: &str = "#7f7f7f";
pub const PROFIT_COLOR: &str = "#2ca02c";
pub const ACCENT_COLOR: &str = "#ff7f0e";
pub const ALERT_COLOR: &str = "#d62728";

/// Colour of the `index`-th series, cycling through the secondary palette
pub fn palette(index: usize) -> &'static str {
    SECONDARY_COLORS[index % SECONDARY_COLORS.len()]
}

/// First `n` colours of the palette, cycled to `count` entries
pub fn palette_cycle(n: usize, count: usize) -> Vec<String> {
    let n = n.clamp(1, SECONDARY_COLORS.len());
    (0..count).map(|i| SECONDARY_COLORS[i % n].to_string()).collect()
}

/// Split rows into one series per group value, groups in order of first
/// appearance, rows in input order.
pub fn split_series<'r, T, G, F>(rows: &'r [T], group: F) -> Vec<(G, Vec<&'r T>)>
where
    G: PartialEq,
    F: Fn(&'r T) -> G,
{
    let mut series: Vec<(G, Vec<&T>)> = Vec::new();
    for row in rows {
        let key = group(row);
        match series.iter_mut().find(|(g, _)| *g == key) {
            Some((_, members)) => members.push(row),
            None => series.push((key, vec![row])),
        }
    }
    series
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_series_keeps_first_appearance() {
        let rows = vec![("b", 1), ("a", 2), ("b", 3)];
        let series = split_series(&rows, |(g, _)| *g);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].0, "b");
        assert_eq!(series[0].1, vec![&("b", 1), &("b", 3)]);
        assert_eq!(series[1].0, "a");
    }

    #[test]
    fn test_palette_cycles() {
        assert_eq!(palette(0), "#13957b");
        assert_eq!(palette(5), "#13957b");
        assert_eq!(palette_cycle(3, 4), vec!["#13957b", "#ff7f0e", "#2ca02c", "#13957b"]);
    }
}
