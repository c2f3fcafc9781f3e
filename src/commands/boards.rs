//! Boards command implementation

/// List all boards compiled into this binary
pub fn list_boards() {
    println!("Supported boards:");
    println!();
    for board in tapcp_board::available_boards() {
        if board.aliases.is_empty() {
            println!("  {:<10} - {}", board.name, board.description);
        } else {
            println!(
                "  {:<10} - {} (aliases: {})",
                board.name,
                board.description,
                board.aliases.join(", ")
            );
        }
    }
}
