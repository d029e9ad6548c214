//! Шумовые поля высоты и влажности.
//!
//! Высота складывается из трёх октав OpenSimplex2 с весами 0.64 / 0.28 / 0.08
//! и частотами 3, 5 и 12 на максимальный размер поля, после чего проходит
//! радиальное переформирование в остров: к краям поля значение гарантированно
//! опускается ниже уровня моря. Влажность генерируется четвёртым слоем и при
//! выборке на тайл пропускается через квантиль бета-распределения,
//! параметризованного высотой, так что влажность стохастически следует
//! за рельефом.
//!
//! Все значения лежат на рабочей шкале `[0, 256]`.

use crate::error::{GenError, Result};
use fastnoise_lite::{FastNoiseLite, NoiseType};
use rand::{Rng, SeedableRng};

/// Веса трёх октав высоты.
pub const ELEVATION_WEIGHTS: [f32; 3] = [0.64, 0.28, 0.08];
/// Частоты октав высоты, в периодах на максимальный размер поля.
pub const ELEVATION_FREQUENCIES: [f32; 3] = [3.0, 5.0, 12.0];
/// Частота слоя влажности.
pub const MOISTURE_FREQUENCY: f32 = 2.0;
/// Верх рабочей шкалы значений.
pub const VALUE_SCALE: f32 = 256.0;
/// Концентрация бета-распределения влажности.
const BETA_SUM: f64 = 5.0;

/// Двумерное поле значений на шкале `[0, 256]`.
#[derive(Debug, Clone)]
pub struct Field {
    pub width: u32,
    pub height: u32,
    pub data: Vec<f32>,
}

impl Field {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0.0; (width as usize) * (height as usize)],
        }
    }

    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> f32 {
        self.data[(y * self.width + x) as usize]
    }

    pub fn set(&mut self, x: u32, y: u32, value: f32) {
        self.data[(y * self.width + x) as usize] = value;
    }

    /// Значение в точке, `None` за границей поля.
    #[must_use]
    pub fn sample(&self, x: u32, y: u32) -> Option<f32> {
        (x < self.width && y < self.height).then(|| self.get(x, y))
    }

    /// Поле, умноженное на скаляр.
    #[must_use]
    pub fn scaled(&self, factor: f32) -> Field {
        Field {
            width: self.width,
            height: self.height,
            data: self.data.iter().map(|v| v * factor).collect(),
        }
    }

    /// Поточечная сумма. Несовпадение размерностей слоёв означает ошибку
    /// вызывающего кода и фатально.
    pub fn add(&self, other: &Field) -> Result<Field> {
        if self.width != other.width || self.height != other.height {
            return Err(GenError::DimensionMismatch {
                width_a: self.width,
                height_a: self.height,
                width_b: other.width,
                height_b: other.height,
            });
        }
        Ok(Field {
            width: self.width,
            height: self.height,
            data: self
                .data
                .iter()
                .zip(&other.data)
                .map(|(a, b)| a + b)
                .collect(),
        })
    }

    /// Радиальное переформирование в остров.
    ///
    /// Для точки на относительном удалении `d ∈ [0, 1]` от центра поля и
    /// сырого значения `e` результат равен
    /// `256 · (0.5 − 0.5·d + (e/256) · (0.5 − 0.25·d))`: в центре рельеф
    /// сохраняется целиком, к краям гарантированно уходит под воду.
    #[must_use]
    pub fn reshape_island(&self) -> Field {
        let mut out = Field::new(self.width, self.height);
        for y in 0..self.height {
            for x in 0..self.width {
                let nx = f64::from(x) / f64::from(self.width) - 0.5;
                let ny = f64::from(y) / f64::from(self.height) - 0.5;
                let d = (2.0 * (nx * nx + ny * ny)).sqrt();
                let e = f64::from(self.get(x, y)) / f64::from(VALUE_SCALE);
                let shaped = f64::from(VALUE_SCALE) * (0.5 - 0.5 * d + e * (0.5 - 0.25 * d));
                out.set(x, y, shaped as f32);
            }
        }
        out
    }
}

/// Сгенерированные слои: итоговая высота и сырая влажность.
#[derive(Debug, Clone)]
pub struct NoiseField {
    pub elevation: Field,
    pub moisture: Field,
}

impl NoiseField {
    /// Строит оба поля. Зёрна четырёх слоёв берутся независимыми розыгрышами
    /// `0..4096` из ChaCha8, посеянного зерном доски.
    pub fn generate(seed: u64, width: u32, height: u32) -> Result<NoiseField> {
        if width == 0 || height == 0 {
            return Err(GenError::Precondition {
                reason: format!("field dimensions {width}x{height} must be positive"),
            });
        }

        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(seed);
        let max_dim = width.max(height) as f32;

        // 1. Три октавы высоты с убывающими весами.
        let low = noise_layer(rng.gen_range(0..4096), width, height, ELEVATION_FREQUENCIES[0] / max_dim);
        let mid = noise_layer(rng.gen_range(0..4096), width, height, ELEVATION_FREQUENCIES[1] / max_dim);
        let high = noise_layer(rng.gen_range(0..4096), width, height, ELEVATION_FREQUENCIES[2] / max_dim);
        let composite = low
            .scaled(ELEVATION_WEIGHTS[0])
            .add(&mid.scaled(ELEVATION_WEIGHTS[1]))?
            .add(&high.scaled(ELEVATION_WEIGHTS[2]))?;

        // 2. Островное переформирование.
        let elevation = composite.reshape_island();

        // 3. Слой влажности, без переформирования.
        let moisture = noise_layer(
            rng.gen_range(0..4096),
            width,
            height,
            MOISTURE_FREQUENCY / max_dim,
        );

        Ok(NoiseField { elevation, moisture })
    }

    /// Влажность тайла: сырое значение слоя как вероятность пропускается
    /// через квантиль Beta(e·5, (1−e)·5), где `e` — нормированная высота
    /// тайла. Среднее распределения равно `e`, так что влажность тянется
    /// за рельефом, сохраняя разброс слоя.
    #[must_use]
    pub fn moisture_for(&self, x: u32, y: u32, elevation: f32) -> f32 {
        let e = (f64::from(elevation) / f64::from(VALUE_SCALE)).clamp(1e-6, 1.0 - 1e-6);
        let p = f64::from(self.moisture.get(x, y)) / f64::from(VALUE_SCALE);
        (beta_quantile(p, e * BETA_SUM, (1.0 - e) * BETA_SUM) * f64::from(VALUE_SCALE)) as f32
    }
}

/// Один слой OpenSimplex2, растянутый на шкалу `[0, 256]`.
fn noise_layer(seed: i32, width: u32, height: u32, frequency: f32) -> Field {
    let mut noise = FastNoiseLite::new();
    noise.set_seed(Some(seed));
    noise.set_noise_type(Some(NoiseType::OpenSimplex2));
    noise.set_frequency(Some(frequency));

    let mut field = Field::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let v = noise.get_noise_2d(x as f32, y as f32);
            field.set(x, y, (v + 1.0) / 2.0 * VALUE_SCALE);
        }
    }
    field
}

/// Квантиль бета-распределения: решение `I_x(α, β) = p` бисекцией.
fn beta_quantile(p: f64, alpha: f64, beta: f64) -> f64 {
    if p <= 0.0 {
        return 0.0;
    }
    if p >= 1.0 {
        return 1.0;
    }
    let (mut lo, mut hi) = (0.0_f64, 1.0_f64);
    for _ in 0..100 {
        let mid = 0.5 * (lo + hi);
        if regularized_beta(mid, alpha, beta) < p {
            lo = mid;
        } else {
            hi = mid;
        }
        if hi - lo < 1e-13 {
            break;
        }
    }
    0.5 * (lo + hi)
}

/// Регуляризованная неполная бета-функция `I_x(a, b)`.
fn regularized_beta(x: f64, a: f64, b: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }
    let ln_front = ln_gamma(a + b) - ln_gamma(a) - ln_gamma(b) + a * x.ln() + b * (1.0 - x).ln();
    let front = ln_front.exp();
    // Непрерывная дробь сходится быстрее на левой половине области.
    if x < (a + 1.0) / (a + b + 2.0) {
        front * beta_continued_fraction(x, a, b) / a
    } else {
        1.0 - front * beta_continued_fraction(1.0 - x, b, a) / b
    }
}

/// Непрерывная дробь для неполной беты методом Ленца.
fn beta_continued_fraction(x: f64, a: f64, b: f64) -> f64 {
    const TINY: f64 = 1e-30;
    const EPS: f64 = 1e-14;

    let qab = a + b;
    let qap = a + 1.0;
    let qam = a - 1.0;

    let mut c = 1.0;
    let mut d = 1.0 - qab * x / qap;
    if d.abs() < TINY {
        d = TINY;
    }
    d = 1.0 / d;
    let mut h = d;

    for m in 1..=200 {
        let m = f64::from(m);
        let m2 = 2.0 * m;

        let aa = m * (b - m) * x / ((qam + m2) * (a + m2));
        d = 1.0 + aa * d;
        if d.abs() < TINY {
            d = TINY;
        }
        c = 1.0 + aa / c;
        if c.abs() < TINY {
            c = TINY;
        }
        d = 1.0 / d;
        h *= d * c;

        let aa = -(a + m) * (qab + m) * x / ((a + m2) * (qap + m2));
        d = 1.0 + aa * d;
        if d.abs() < TINY {
            d = TINY;
        }
        c = 1.0 + aa / c;
        if c.abs() < TINY {
            c = TINY;
        }
        d = 1.0 / d;
        let del = d * c;
        h *= del;

        if (del - 1.0).abs() < EPS {
            break;
        }
    }
    h
}

/// Логарифм гамма-функции, аппроксимация Ланцоша (g = 7, 9 коэффициентов).
fn ln_gamma(x: f64) -> f64 {
    const COEFFS: [f64; 9] = [
        0.999_999_999_999_809_9,
        676.520_368_121_885_1,
        -1_259.139_216_722_402_8,
        771.323_428_777_653_1,
        -176.615_029_162_140_6,
        12.507_343_278_686_905,
        -0.138_571_095_265_720_12,
        9.984_369_578_019_572e-6,
        1.505_632_735_149_311_6e-7,
    ];

    if x < 0.5 {
        // Отражение для левой полуоси.
        return std::f64::consts::PI.ln()
            - (std::f64::consts::PI * x).sin().ln()
            - ln_gamma(1.0 - x);
    }

    let x = x - 1.0;
    let mut acc = COEFFS[0];
    for (i, &c) in COEFFS.iter().enumerate().skip(1) {
        acc += c / (x + i as f64);
    }
    let t = x + 7.5;
    0.5 * (2.0 * std::f64::consts::PI).ln() + (x + 0.5) * t.ln() - t + acc.ln()
}
