//! 音频处理 - 业务能力层
//!
//! 峰值归一化：把最大振幅拉到满刻度，输出 16 位 PCM WAV

use anyhow::{Context, Result};
use std::io::Cursor;

/// 低于该峰值视为静音
const SILENCE_THRESHOLD: f32 = 1e-6;

/// 对 WAV 数据做峰值归一化
///
/// 保留原始声道数和采样率，输出统一为 16 位整数 PCM
pub fn normalize_wav(wav_bytes: &[u8]) -> Result<Vec<u8>> {
    let mut reader = hound::WavReader::new(Cursor::new(wav_bytes)).context("无法解析 WAV 数据")?;
    let spec = reader.spec();

    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<Result<_, _>>()
            .context("无法读取浮点采样")?,
        hound::SampleFormat::Int => {
            let scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<Result<_, _>>()
                .context("无法读取整数采样")?
        }
    };

    let normalized = normalize_peak(&samples);
    encode_pcm16(spec.channels, spec.sample_rate, &normalized)
}

/// 峰值归一化，静音输入返回全零
pub fn normalize_peak(samples: &[f32]) -> Vec<f32> {
    let peak = samples.iter().fold(0.0f32, |acc, s| acc.max(s.abs()));
    if peak > SILENCE_THRESHOLD {
        samples.iter().map(|s| s / peak).collect()
    } else {
        vec![0.0; samples.len()]
    }
}

fn encode_pcm16(channels: u16, sample_rate: u32, samples: &[f32]) -> Result<Vec<u8>> {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut buf = Cursor::new(Vec::<u8>::new());
    {
        let mut writer = hound::WavWriter::new(&mut buf, spec).context("无法创建 WAV 写入器")?;
        for &s in samples {
            writer.write_sample(to_pcm16(s))?;
        }
        writer.finalize()?;
    }
    Ok(buf.into_inner())
}

fn to_pcm16(x: f32) -> i16 {
    let x = x.clamp(-1.0, 1.0);
    if x >= 0.0 {
        (x * 32767.0).round() as i16
    } else {
        (x * 32768.0).round() as i16
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wav_i16(sample_rate: u32, pcm: &[i16]) -> Vec<u8> {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut buf = Cursor::new(Vec::new());
        {
            let mut w = hound::WavWriter::new(&mut buf, spec).unwrap();
            for &s in pcm {
                w.write_sample(s).unwrap();
            }
            w.finalize().unwrap();
        }
        buf.into_inner()
    }

    fn decode(bytes: Vec<u8>) -> (hound::WavSpec, Vec<i16>) {
        let mut reader = hound::WavReader::new(Cursor::new(bytes)).unwrap();
        let spec = reader.spec();
        let samples = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        (spec, samples)
    }

    #[test]
    fn test_normalize_peak_scales_to_full() {
        let out = normalize_peak(&[0.25, -0.5, 0.1]);
        assert_eq!(out, vec![0.5, -1.0, 0.2]);
    }

    #[test]
    fn test_normalize_peak_silence() {
        assert_eq!(normalize_peak(&[0.0, 1e-9, -1e-8]), vec![0.0, 0.0, 0.0]);
        assert!(normalize_peak(&[]).is_empty());
    }

    #[test]
    fn test_normalize_wav_keeps_format() {
        let input = wav_i16(16000, &[0, 8192, -16384, 0]);
        let (spec, samples) = decode(normalize_wav(&input).unwrap());

        assert_eq!(spec.sample_rate, 16000);
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.bits_per_sample, 16);
        assert_eq!(samples[2], -32768);
        assert_eq!(samples[1], 16384);
        assert_eq!(samples[0], 0);
    }

    #[test]
    fn test_normalize_wav_rejects_garbage() {
        assert!(normalize_wav(b"not a wav").is_err());
    }
}
