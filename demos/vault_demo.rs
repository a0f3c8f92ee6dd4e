use shamir_vault::{
    FileShareStore, ShamirError, ShareStore, decode_share, encode_share, inspect, passphrase,
    recover, share,
};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("shamir_vault=debug").init();

    println!("=== Shamir Vault Demo ===\n");

    let secret = b"This is a secret message that needs to be protected!";
    println!("Secret: {:?}", std::str::from_utf8(secret)?);
    println!("Configuration: 5 total shares, threshold of 3\n");

    // Demo 1: Split and recover
    println!("Demo 1: Split and recover from any 3 shares");
    let shares = share(secret, 3, 5)?;
    for (index, encoded) in &shares {
        println!("  share {index}: {encoded}");
    }
    let recovered = recover([&shares[&1], &shares[&3], &shares[&5]])?;
    println!("Recovery successful: {}", recovered == secret);
    println!();

    // Demo 2: Determinism
    println!("Demo 2: Splitting the same secret twice gives the same shares");
    println!("Identical: {}", share(secret, 3, 5)? == shares);
    println!();

    // Demo 3: Inspect without recovering
    println!("Demo 3: Inspect share headers");
    let info = inspect(&shares[&2])?;
    println!(
        "  version {}, index {}, threshold {}, {} payload bytes",
        info.version, info.index, info.threshold, info.payload_len
    );
    println!();

    // Demo 4: Tampering is detected
    println!("Demo 4: A single flipped bit is rejected");
    let mut raw = decode_share(&shares[&1])?;
    raw[10] ^= 0x01;
    let forged = encode_share(&raw);
    match recover([&forged, &shares[&2], &shares[&3]]) {
        Err(ShamirError::Tampered) => println!("Tampering detected"),
        other => println!("Unexpected result: {other:?}"),
    }
    println!();

    // Demo 5: File storage
    println!("Demo 5: Store shares on disk and recover from what is left");
    let dir = tempfile::tempdir()?;
    let mut store = FileShareStore::new(dir.path())?;
    store.store_all(&shares)?;
    store.delete_share(1)?;
    store.delete_share(4)?;
    let remaining = store.load_all()?;
    println!("Shares on disk: {:?}", store.list_shares()?);
    println!(
        "Recovery successful: {}",
        recover(remaining.values())? == secret
    );
    println!();

    // Demo 6: Passphrase splitting
    println!("Demo 6: Split a key derived from a passphrase");
    let shares = passphrase("correct horse battery staple", 2, 3)?;
    let key = recover(shares.values().take(2))?;
    let hex: String = key.iter().map(|b| format!("{b:02x}")).collect();
    println!("Derived key: {hex}");

    Ok(())
}
