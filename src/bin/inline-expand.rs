// inline-expand command-line entry point
// Usage: inline-expand <expand|exports|check> ...

fn main() {
    inline_expand::cli::run();
}
