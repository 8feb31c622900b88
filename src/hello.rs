//! Greeting kernel: the smallest possible round trip through the device.

use crate::error::{Error, Result};
use crate::gpu::{GpuBuffer, GpuContext, KernelSource};

/// Slots in the greeting buffer, one character each.
pub const GREETING_SLOTS: usize = 16;

/// Compile `source`, run it as a single invocation and return the text it
/// wrote.
pub fn run_hello(ctx: &GpuContext, source: &KernelSource) -> Result<String> {
    let kernel = source.compile(ctx)?;

    ctx.dispatch_scope(|device| {
        let out = GpuBuffer::output::<u32>(ctx, "greeting", GREETING_SLOTS);

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("greeting-bind-group"),
            layout: kernel.bind_group_layout(),
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: out.binding(),
            }],
        });

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("greeting-encoder"),
        });

        {
            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("greeting-pass"),
                timestamp_writes: None,
            });
            pass.set_pipeline(kernel.pipeline());
            pass.set_bind_group(0, &bind_group, &[]);
            pass.dispatch_workgroups(1, 1, 1);
        }

        ctx.queue().submit(Some(encoder.finish()));

        let slots = out.read_back::<u32>(ctx)?;
        decode_greeting(&slots)
    })
}

/// Decode slots up to the first zero as ASCII text.
pub fn decode_greeting(slots: &[u32]) -> Result<String> {
    slots
        .iter()
        .take_while(|&&slot| slot != 0)
        .map(|&slot| {
            u8::try_from(slot)
                .ok()
                .filter(u8::is_ascii)
                .map(char::from)
                .ok_or_else(|| Error::dispatch(format!("greeting slot holds non-ASCII value {}", slot)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(text: &str) -> Vec<u32> {
        let mut slots: Vec<u32> = text.bytes().map(u32::from).collect();
        slots.resize(GREETING_SLOTS, 0);
        slots
    }

    #[test]
    fn test_decode_stops_at_zero() {
        let slots = encode("Hello, World!\n");
        assert_eq!(decode_greeting(&slots).unwrap(), "Hello, World!\n");
    }

    #[test]
    fn test_decode_full_buffer() {
        let slots: Vec<u32> = (0..GREETING_SLOTS as u32).map(|i| 97 + i).collect();
        assert_eq!(decode_greeting(&slots).unwrap(), "abcdefghijklmnop");
    }

    #[test]
    fn test_decode_empty() {
        assert_eq!(decode_greeting(&[0; GREETING_SLOTS]).unwrap(), "");
    }

    #[test]
    fn test_decode_rejects_non_ascii() {
        assert!(decode_greeting(&[72, 200, 0]).is_err());
        assert!(decode_greeting(&[72, 0x1_0000]).is_err());
    }

    #[test]
    fn test_builtin_kernel_fits_buffer() {
        // One write per slot index used by the kernel, all below GREETING_SLOTS.
        let source = KernelSource::hello();
        for i in GREETING_SLOTS..GREETING_SLOTS + 4 {
            assert!(!source.text.contains(&format!("out[{}]", i)));
        }
    }
}
