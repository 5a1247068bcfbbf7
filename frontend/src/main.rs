//! Entry point for the WASM application

pub fn main() {
    imagedrop_frontend::boot();
}
