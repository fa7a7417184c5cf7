//! Basic usage example for the lollipop sequence counters.

use rpl_sequence::{ComparisonWindow, SequenceNumber, SequenceOrdering};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== RPL Sequence Counter Example ===\n");

    let window = ComparisonWindow::default();

    // 1. A freshly initialized counter advances through the sequential region
    println!("1. Advancing a fresh counter...");
    let mut version = SequenceNumber::INITIAL;
    for _ in 0..3 {
        version = version.increment();
    }
    println!("   After 3 increments: {} ({:?})", version, version.region());

    // 2. Wrap behavior at the top of each region
    println!("\n2. Region wrap behavior...");
    println!("   127 increments to {}", SequenceNumber::new(127).increment());
    println!("   255 increments to {}", SequenceNumber::new(255).increment());

    // 3. Ordering two observed values
    println!("\n3. Ordering observed counter values...");
    let local = SequenceNumber::new(240);
    let received = SequenceNumber::new(5);
    match local.compare(received, window) {
        SequenceOrdering::Greater => println!("   {} is more recent than {}", local, received),
        SequenceOrdering::Lesser => println!("   {} is more recent than {}", received, local),
        SequenceOrdering::Equal => println!("   values are identical"),
        SequenceOrdering::Incomparable => println!("   no safe ordering exists"),
    }

    // 4. A wrapped counter that just took over
    println!("\n4. Wrap takeover within the window...");
    let stale = SequenceNumber::new(250);
    let fresh = SequenceNumber::new(5);
    println!(
        "   compare({}, {}) = {:?}",
        stale,
        fresh,
        stale.compare(fresh, window)
    );

    // 5. Values too far apart to order
    println!("\n5. Unorderable values...");
    let a = SequenceNumber::new(200);
    let b = SequenceNumber::new(150);
    println!("   compare({}, {}) = {:?}", a, b, a.compare(b, window));
    println!("   is_comparable: {}", a.is_comparable(b, window));

    // 6. A wider window restores the ordering
    let wide = ComparisonWindow::new(50)?;
    println!("\n6. With a window of {}...", wide.get());
    println!("   compare({}, {}) = {:?}", a, b, a.compare(b, wide));

    println!("\n=== Example completed successfully! ===");
    Ok(())
}
