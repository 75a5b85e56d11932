const SHADER: &str = include_str!("../src/render/shader.wgsl");

#[test]
fn lighting_is_two_sided() {
    let fs_main = SHADER
        .split("fn fs_main")
        .nth(1)
        .expect("shader has a fragment entry point");
    assert!(fs_main.contains("abs(dot(normal, normalize(camera.key_dir.xyz)))"));
    assert!(fs_main.contains("abs(dot(normal, normalize(camera.fill_dir.xyz)))"));
    assert!(!fs_main.contains("max(dot("));
}
