// Example: range and padding for a list whose heights are partly measured.
use windowing::{Align, HeightModel, RangeFinder, WindowConfig, compute_padding};

fn main() {
    let config = WindowConfig::default();
    let mut heights = HeightModel::from_config(1_000_000, &config);
    let finder = RangeFinder::from_config(&config);

    let range = finder.find_range(&heights, 123_456.0, 600.0, heights.len(), config.overscan);
    let padding = compute_padding(&heights, range, heights.len());
    println!("total_height={}", heights.total_height());
    println!("range={range:?} padding={padding:?}");

    // The host rendered the window and reports what it saw.
    heights.record_many(range.iter().map(|i| (i, if i % 2 == 0 { 72.0 } else { 36.0 })));
    let range = finder.find_range(&heights, 123_456.0, 600.0, heights.len(), config.overscan);
    let padding = compute_padding(&heights, range, heights.len());
    println!(
        "after measuring: average={} range={range:?} padding={padding:?}",
        heights.average_height()
    );

    let off = finder.offset_for_index(&heights, 999_999, Align::End, 600.0, 123_456.0);
    println!("scroll target for the last item: {off:?}");
}
