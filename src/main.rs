fn main() -> glib::ExitCode {
    memory_match::ui::app::run()
}
