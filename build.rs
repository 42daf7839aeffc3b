fn main() {
    // 仅桌面壳需要 tauri-build 生成上下文；库与测试构建跳过
    #[cfg(feature = "desktop")]
    tauri_build::build();
}
