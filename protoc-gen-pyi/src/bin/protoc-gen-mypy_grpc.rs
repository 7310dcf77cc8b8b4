fn main() {
    protoc_gen_pyi::main(pyi_build::Target::Grpc)
}
