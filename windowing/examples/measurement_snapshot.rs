// Example: export and restore measured heights.
use windowing::HeightModel;

fn main() {
    // Persisting measurements across screens/sessions lets the next list start with better
    // estimates instead of re-measuring everything.
    let mut m1 = HeightModel::new(10, None, 50.0);
    m1.record(2, 10.0);
    m1.record(5, 42.0);

    let snapshot = m1.snapshot();
    println!("exported entries={}", snapshot.len());

    let mut m2 = HeightModel::new(10, None, 50.0);
    println!("before restore: h2={} h5={}", m2.get(2), m2.get(5));

    m2.restore(&snapshot);
    println!(
        "after restore: measured={} h2={} h5={} average={}",
        m2.measured_count(),
        m2.get(2),
        m2.get(5),
        m2.average_height()
    );
}
