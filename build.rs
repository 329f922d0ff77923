fn main() {
    // Host builds (tests, fuzzing) never link ESP-IDF.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
