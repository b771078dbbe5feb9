//! 可复现的伪随机序列
//!
//! 标准 MT19937（32 位 Mersenne Twister）。同一种子总是产生同一序列，
//! 压力测试用它来决定工作量、目标持锁深度和获取方式。

/// 状态字数
const N: usize = 624;
/// 扭转偏移
const M: usize = 397;
const MATRIX_A: u32 = 0x9908_b0df;
const UPPER_MASK: u32 = 0x8000_0000;
const LOWER_MASK: u32 = 0x7fff_ffff;

/// 2^-24，用于把 24 位整数映射到 `[0, 1)`
const FRACTION_SCALE: f32 = 1.0 / 16_777_216.0;

/// 32 位 Mersenne Twister 生成器
#[derive(Clone)]
pub struct MersenneTwister {
    state: [u32; N],
    index: usize,
}

impl MersenneTwister {
    /// 用给定种子初始化
    pub fn new(seed: u32) -> Self {
        let mut state = [0u32; N];
        state[0] = seed;
        for i in 1..N {
            let prev = state[i - 1];
            state[i] = 1_812_433_253u32
                .wrapping_mul(prev ^ (prev >> 30))
                .wrapping_add(i as u32);
        }
        MersenneTwister { state, index: N }
    }

    /// 下一个 32 位无符号整数
    pub fn integer(&mut self) -> u32 {
        if self.index >= N {
            self.twist();
        }
        let mut y = self.state[self.index];
        self.index += 1;

        y ^= y >> 11;
        y ^= (y << 7) & 0x9d2c_5680;
        y ^= (y << 15) & 0xefc6_0000;
        y ^= y >> 18;
        y
    }

    /// `[0, 1)` 上的均匀小数
    ///
    /// 只取高 24 位，保证 f32 舍入后也不会达到 1.0。
    pub fn fraction(&mut self) -> f32 {
        (self.integer() >> 8) as f32 * FRACTION_SCALE
    }

    /// 平均值为 `rate` 的指数分布间隔（泊松过程的到达间隔）
    pub fn poisson_interval(&mut self, rate: f32) -> f32 {
        -(1.0 - self.fraction()).ln() * rate
    }

    /// 推进生成器 `units` 次，作为可复现、有界的忙等待
    pub fn spin(&mut self, units: u64) {
        for _ in 0..units {
            std::hint::black_box(self.integer());
        }
    }

    fn twist(&mut self) {
        for i in 0..N {
            let x = (self.state[i] & UPPER_MASK) | (self.state[(i + 1) % N] & LOWER_MASK);
            let mut next = x >> 1;
            if x & 1 != 0 {
                next ^= MATRIX_A;
            }
            self.state[i] = self.state[(i + M) % N] ^ next;
        }
        self.index = 0;
    }
}

impl core::fmt::Debug for MersenneTwister {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MersenneTwister")
            .field("index", &self.index)
            .finish_non_exhaustive()
    }
}
