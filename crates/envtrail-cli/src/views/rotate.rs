use envtrail_sdk::types::RotateReceipt;

use super::{Palette, format_bytes};

pub fn print_rotation(receipt: &RotateReceipt, p: Palette) {
    let Some(outcome) = &receipt.outcome else {
        println!(
            "No pointer file in {}; nothing to rotate",
            receipt.project.display()
        );
        return;
    };

    println!(
        "{} {} ({} -> {})",
        p.ok("Backed up to"),
        outcome.backup_file,
        format_bytes(outcome.size_before),
        format_bytes(outcome.size_after)
    );
    for name in &outcome.pruned {
        println!("  {} {}", p.dim("pruned"), name);
    }
}
