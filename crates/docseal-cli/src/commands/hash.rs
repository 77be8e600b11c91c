//! Hash command implementation.

use docseal_canonical::HashingService;

pub fn run(input: Option<String>, text: bool) -> Result<(), Box<dyn std::error::Error>> {
    let bytes = super::read_input(input.as_deref())?;
    let hashing = HashingService::default();

    if text {
        let text = String::from_utf8(bytes).map_err(|e| format!("Input is not UTF-8: {}", e))?;
        println!("{}", hashing.fingerprint(&text));
    } else {
        println!("{}", hashing.content_identifier(&bytes));
    }
    Ok(())
}
