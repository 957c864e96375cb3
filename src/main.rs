fn main() {
    damageable::game::run();
}
