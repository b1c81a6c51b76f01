use rx_gen_core::model::generation_config::{GenerationConfig, SeedStrategy};
use rx_gen_core::model::pattern::{BytePattern, TextPattern};
use rx_gen_core::{GenError, Match, generate_match};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Set RUST_LOG=debug (or trace) to see parser and generator decisions
    env_logger::init();

    // One-shot generation: the pattern's type decides the output's type
    match generate_match(r"(?P<user>\w{3,8})@example\.(?:com|org)", None)? {
        Match::Text(s) => println!("Text match: {}", s),
        Match::Bytes(b) => println!("Byte match: {:?}", b),
    }
    // Byte patterns are never decoded, invalid UTF-8 included
    if let Some(bytes) = generate_match(b"\x89PNG\r\n\x1a\n[\x00-\xff]{4}", Some(7))?.as_bytes() {
        println!("Byte match: {:02x?}", bytes);
    }

    // Lookarounds at the edges of the pattern are part of the output
    println!("Boundary lookaround: {}", generate_match("(?<=id:)\\d{4}(?=;)", None)?.as_text().unwrap_or_default());

    // Compile once, then generate many values
    let pattern = TextPattern::compile(r"[A-Z][a-z]+ \d{1,3}(?:st|nd|rd|th) (?:Street|Avenue)")?;

    // A fixed seed makes the output reproducible
    let mut config = GenerationConfig::seeded(2024);

    // Unbounded repeats ('*', '+', '{m,}') pick at most 'repeat_cap' extra copies
    config.set_repeat_cap(4);

    // Every call stops after this many expansion steps
    config.set_expansion_limit(4096)?;

    // Attempting to set an invalid limit
    match config.set_expansion_limit(0) {
        Ok(_) => println!("Should not happen"),
        Err(_) => println!("Expansion limit 0 is invalid, must be greater than 0"),
    }

    for (i, value) in pattern.generate_batch(10, &config)?.iter().enumerate() {
        println!("Generated value {}: {}", i + 1, value);
    }

    // Compiled patterns can be stored and reloaded
    let stored = BytePattern::compile(b"GET /[a-z]{1,8} HTTP/1\\.[01]\r\n")?.to_bytes()?;
    let reloaded = BytePattern::from_bytes(&stored)?;
    config.seed = SeedStrategy::Random;
    println!("Reloaded pattern: {:?}", String::from_utf8_lossy(&reloaded.generate(&config)?));

    // Errors are classified so a caller can decide what to do next
    for bad in ["(a)\\1", "[z-a]", "(?:ab){100000}"] {
        match generate_match(bad, None) {
            Ok(_) => println!("Should not happen"),
            Err(e @ GenError::GenerationLimitExceeded { .. }) => println!("{} (retry with a larger limit)", e),
            Err(e) => println!("{}", e),
        }
    }

    Ok(())
}
