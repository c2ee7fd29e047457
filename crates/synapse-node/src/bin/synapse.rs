fn main() -> synapse_node::Result<()> {
    synapse_node::run()
}
