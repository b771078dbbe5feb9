//! 线程绑核

use crate::StressError;

/// 把调用线程绑定到编号为 `cpu` 的处理器
#[cfg(target_os = "linux")]
pub fn pin_current_thread(cpu: usize) -> Result<(), StressError> {
    if cpu >= libc::CPU_SETSIZE as usize {
        return Err(StressError::Affinity {
            cpu,
            errno: libc::EINVAL,
        });
    }

    // SAFETY: cpu_set_t 是纯位图，全零即空集合
    let mut set: libc::cpu_set_t = unsafe { core::mem::zeroed() };
    // SAFETY: cpu 已确认小于 CPU_SETSIZE
    unsafe { libc::CPU_SET(cpu, &mut set) };
    // SAFETY: pid 0 表示调用线程，set 是有效的 cpu_set_t
    let rc = unsafe { libc::sched_setaffinity(0, core::mem::size_of::<libc::cpu_set_t>(), &set) };
    if rc != 0 {
        return Err(StressError::Affinity {
            cpu,
            errno: std::io::Error::last_os_error().raw_os_error().unwrap_or(0),
        });
    }
    Ok(())
}

/// 把调用线程绑定到编号为 `cpu` 的处理器
#[cfg(not(target_os = "linux"))]
pub fn pin_current_thread(_cpu: usize) -> Result<(), StressError> {
    Err(StressError::AffinityUnsupported)
}

#[cfg(all(test, target_os = "linux"))]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_cpu_rejected() {
        let err = pin_current_thread(libc::CPU_SETSIZE as usize).unwrap_err();
        assert!(matches!(err, StressError::Affinity { errno, .. } if errno == libc::EINVAL));
    }

    #[test]
    fn test_pin_to_current_cpu() {
        // 在单独的线程里绑核，避免影响测试线程本身
        std::thread::spawn(|| {
            // SAFETY: sched_getcpu 没有前置条件
            let cpu = unsafe { libc::sched_getcpu() };
            pin_current_thread(cpu as usize).unwrap();
            assert_eq!(unsafe { libc::sched_getcpu() }, cpu);
        })
        .join()
        .unwrap();
    }
}
