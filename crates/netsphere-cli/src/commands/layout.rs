//! Print the hardcoded live-field layout.

use anyhow::Result;
use netsphere_core::memory::layout;

pub fn run(json: bool) -> Result<()> {
    let fields = layout::descriptors();

    if json {
        println!("{}", serde_json::to_string_pretty(&fields)?);
        return Ok(());
    }

    println!("{:<18} {:<12} {:<8} {}", "Field", "Base", "Offset", "Width");
    for field in &fields {
        println!(
            "{:<18} 0x{:08X}  0x{:<6X} {}",
            field.kind.to_string(),
            field.base_offset,
            field.sub_offset,
            field.width
        );
    }
    println!();
    println!("Offsets match one client build; other builds read and write unrelated memory.");

    Ok(())
}
