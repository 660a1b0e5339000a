fn main() {
    // Emits ESP-IDF sysenv linker/cfg metadata when the espidf toolchain
    // environment is present; a no-op on plain host builds.
    embuild::espidf::sysenv::output();
}
