use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use anyhow::{anyhow, Context};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SizedSample};
use log::error;

const TONE_HZ: f32 = 440.0;
const VOLUME: f32 = 0.2;

/// A 440 Hz tone on a stream that stays open; `set_playing` gates it.
pub struct Sound {
    _stream: cpal::Stream,
    playing: Arc<AtomicBool>,
}

impl Sound {
    pub fn new() -> anyhow::Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .context("no output device available")?;
        let mut supported_configs_range = device
            .supported_output_configs()
            .context("error while querying configs")?;
        let supported_config = supported_configs_range
            .next()
            .context("no supported config")?
            .with_max_sample_rate();
        let sample_format = supported_config.sample_format();
        let config: cpal::StreamConfig = supported_config.into();
        let playing = Arc::new(AtomicBool::new(false));

        let gate = playing.clone();
        let stream = match sample_format {
            cpal::SampleFormat::I8 => Self::build::<i8>(&device, &config, gate),
            cpal::SampleFormat::I16 => Self::build::<i16>(&device, &config, gate),
            cpal::SampleFormat::I32 => Self::build::<i32>(&device, &config, gate),
            cpal::SampleFormat::I64 => Self::build::<i64>(&device, &config, gate),
            cpal::SampleFormat::U8 => Self::build::<u8>(&device, &config, gate),
            cpal::SampleFormat::U16 => Self::build::<u16>(&device, &config, gate),
            cpal::SampleFormat::U32 => Self::build::<u32>(&device, &config, gate),
            cpal::SampleFormat::U64 => Self::build::<u64>(&device, &config, gate),
            cpal::SampleFormat::F32 => Self::build::<f32>(&device, &config, gate),
            cpal::SampleFormat::F64 => Self::build::<f64>(&device, &config, gate),
            sample_format => Err(anyhow!("unsupported sample format '{sample_format}'")),
        }?;
        stream.play().context("could not start audio stream")?;

        Ok(Self {
            _stream: stream,
            playing,
        })
    }

    pub fn set_playing(&self, on: bool) {
        self.playing.store(on, Ordering::Relaxed);
    }

    fn build<T>(
        device: &cpal::Device,
        config: &cpal::StreamConfig,
        playing: Arc<AtomicBool>,
    ) -> anyhow::Result<cpal::Stream>
    where
        T: SizedSample + FromSample<f32>,
    {
        let sample_rate = config.sample_rate.0 as f32;
        let channels = config.channels as usize;

        let mut sample_clock = 0f32;
        let mut next_value = move || {
            sample_clock = (sample_clock + 1.0) % sample_rate;
            (sample_clock * TONE_HZ * 2.0 * std::f32::consts::PI / sample_rate).sin() * VOLUME
        };

        let err_fn = |err| error!("an error occurred on stream: {}", err);

        let stream = device.build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                let on = playing.load(Ordering::Relaxed);
                Self::write_data(data, channels, on, &mut next_value)
            },
            err_fn,
            None,
        )?;
        Ok(stream)
    }

    fn write_data<T>(
        output: &mut [T],
        channels: usize,
        on: bool,
        next_sample: &mut dyn FnMut() -> f32,
    ) where
        T: Sample + FromSample<f32>,
    {
        for frame in output.chunks_mut(channels) {
            let value: T = T::from_sample(if on { next_sample() } else { 0.0 });
            for sample in frame.iter_mut() {
                *sample = value;
            }
        }
    }
}
