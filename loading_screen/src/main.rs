//////////////////////////////////////////////////
// Entry point

#[cfg(not(target_os = "android"))]
fn main() {
    loading_screen::main();
}

// android starts through `android_main` of the cdylib
#[cfg(target_os = "android")]
fn main() {}
