//! Console diagnostics with the `[INFO]`/`[WARN]` prefixes the generated
//! framework also uses. Errors never go through here; they travel as
//! `crate::error::Error` values up to main.

pub fn banner() {
    println!("{}", "-".repeat(60));
}

pub fn info(msg: impl AsRef<str>) {
    println!("[INFO] {}", msg.as_ref());
}

pub fn warn(msg: impl AsRef<str>) {
    eprintln!("[WARN] {}", msg.as_ref());
}
