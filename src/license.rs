/// Weights whose licenses forbid commercial use
pub const NON_COMMERCIAL_WEIGHTS: &[&str] = &[
    "inswapper_128.onnx",
    "inswapper_128_fp16.onnx",
    "proteus_v02.safetensors",
    "RealVisXL_V3.0_Turbo.safetensors",
    "sd_xl_turbo_1.0.safetensors",
    "sd_xl_turbo_1.0_fp16.safetensors",
    "svd.safetensors",
    "svd_xt.safetensors",
    "turbovisionxlSuperFastXLBasedOnNew_tvxlV32Bakedvae",
    "copaxTimelessxlSDXL1_v8.safetensors",
    "MODILL_XL_0.27_RC.safetensors",
    "epicrealismXL_v10.safetensors",
    "RMBG-1.4/model.pth",
];

/// Exact, case-sensitive membership in [`NON_COMMERCIAL_WEIGHTS`]
#[must_use]
pub fn is_non_commercial_only(filename: &str) -> bool {
    NON_COMMERCIAL_WEIGHTS.contains(&filename)
}
