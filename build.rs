fn main() -> std::io::Result<()> {
    // Exposes GIT_COMMIT_HASH and friends through `built_info`.
    built::write_built_file()
}
