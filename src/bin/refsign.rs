//! Reference-backed candidate shim honoring the external signer contract:
//! hex secret key as the sole argument, message on stdin, base64 Ed25519
//! signature on stdout. Useful as a known-good candidate and as the fixture
//! the integration tests drive.

use std::io::{Read, Write};

use base64::{Engine as _, engine::general_purpose::STANDARD};
use ed25519_dalek::{SECRET_KEY_LENGTH, Signer, SigningKey};
use zeroize::Zeroizing;

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let hexsk = std::env::args().nth(1).ok_or("usage: refsign <secret-key-hex>")?;
    let seed = Zeroizing::new(hex::decode(&hexsk)?);
    let seed: &[u8; SECRET_KEY_LENGTH] =
        seed.as_slice().try_into().map_err(|_| "secret key must be 32 bytes")?;
    let key = SigningKey::from_bytes(seed);

    let mut message = Vec::new();
    std::io::stdin().read_to_end(&mut message)?;

    let signature = key.sign(&message);
    let mut stdout = std::io::stdout();
    stdout.write_all(STANDARD.encode(signature.to_bytes()).as_bytes())?;
    stdout.flush()?;
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
