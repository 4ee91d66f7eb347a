// Compiled-in defaults are read with option_env!, so a changed variable must
// trigger a rebuild of this crate.
fn main() {
    for var in ["WIFI_SSID", "WIFI_PASSWORD", "OPENWEATHER_API_KEY"] {
        println!("cargo:rerun-if-env-changed={var}");
    }
    println!("cargo:rerun-if-changed=build.rs");
}
