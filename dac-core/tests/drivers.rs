use std::env;

use matches::assert_matches;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use dac_core::{mcp4725, prelude::*, InvalidArgument, OutOfRange};

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn mk_rng() -> Pcg32 {
    let seed = env::var("DAC_SEED")
        .map(|seed| seed.parse().expect("Couldn't parse the seed into a number!"))
        .unwrap_or(0);
    Pcg32::seed_from_u64(seed)
}

#[derive(Debug, PartialEq)]
struct Nack;

/// Models the registers of an MCP4725 closely enough to read back what the
/// driver wrote.
#[derive(Debug, Default)]
struct FakeMcp4725 {
    address: u16,
    dac: Mcp4725Data,
    eeprom: Mcp4725Data,
    busy: bool,
    writes: usize,
    fail: bool,
}

impl FakeMcp4725 {
    fn new(address: u16) -> FakeMcp4725 {
        FakeMcp4725 {
            address,
            ..FakeMcp4725::default()
        }
    }
}

impl I2cBus for FakeMcp4725 {
    type Error = Nack;

    fn write(&mut self, address: u16, bytes: &[u8]) -> Result<(), Nack> {
        if self.fail || address != self.address {
            return Err(Nack);
        }
        self.writes += 1;
        match bytes {
            // fast mode: 0 0 PD1 PD0 D11 D10 D9 D8, D7..D0
            [b0, b1] if b0 >> 6 == 0 => {
                self.dac = Mcp4725Data {
                    out_reg: (u16::from(b0 & 0x0F) << 8) | u16::from(*b1),
                    power_mode: (b0 >> 4) & 0b11,
                };
            }
            // C2 C1 C0 X X PD1 PD0 X, D11..D4, D3..D0 X X X X
            [b0, b1, b2] => {
                let data = Mcp4725Data {
                    out_reg: (u16::from(*b1) << 4) | u16::from(b2 >> 4),
                    power_mode: (b0 >> 1) & 0b11,
                };
                match b0 >> 5 {
                    0b010 => self.dac = data,
                    0b011 => {
                        self.dac = data;
                        self.eeprom = data;
                        self.busy = true;
                    }
                    cmd => panic!("unexpected command {:03b}", cmd),
                }
            }
            _ => panic!("unexpected frame {:02x?}", bytes),
        }
        Ok(())
    }

    fn read(&mut self, address: u16, buf: &mut [u8]) -> Result<(), Nack> {
        if self.fail || address != self.address {
            return Err(Nack);
        }
        assert_eq!(buf.len(), 5);
        buf[0] = ((self.busy as u8) << 7) | (self.dac.power_mode << 1);
        buf[1] = (self.dac.out_reg >> 4) as u8;
        buf[2] = (self.dac.out_reg << 4) as u8;
        buf[3] = (self.eeprom.power_mode << 5) | (self.eeprom.out_reg >> 8) as u8;
        buf[4] = self.eeprom.out_reg as u8;
        Ok(())
    }
}

/// A TLC5615 shift register: every frame pushes the previous one out.
#[derive(Debug, Default)]
struct FakeTlc5615 {
    shift_register: [u8; 2],
    fail: bool,
}

impl FakeTlc5615 {
    fn output(&self) -> u16 {
        u16::from_be_bytes(self.shift_register) >> 2
    }
}

impl SpiBus for FakeTlc5615 {
    type Error = Nack;

    fn write(&mut self, bytes: &[u8]) -> Result<(), Nack> {
        let mut sink = [0; 2];
        self.transfer(&mut sink, bytes)
    }

    fn transfer(&mut self, recv: &mut [u8], send: &[u8]) -> Result<(), Nack> {
        if self.fail {
            return Err(Nack);
        }
        assert_eq!(send.len(), 2);
        assert_eq!(send[1] & 0b11, 0, "sub-LSB bits must be zero");
        recv.copy_from_slice(&self.shift_register);
        self.shift_register.copy_from_slice(send);
        Ok(())
    }
}

#[test]
fn mcp4725_fast_write_round_trip() {
    init();
    let mut chip = FakeMcp4725::new(0x62);
    let mut dac = Mcp4725::new(&mut chip, 0x62).unwrap();
    let mut rng = mk_rng();

    for _ in 0..500 {
        let value: u16 = rng.gen_range(0, 4096);
        let power_mode: u8 = rng.gen_range(0, 4);
        dac.fast_write(value, power_mode).unwrap();
        let status = dac.get_status().unwrap();
        assert_eq!(
            status.data,
            Mcp4725Data {
                out_reg: value,
                power_mode
            }
        );
        assert_eq!(status.eeprom_data, Mcp4725Data::default());
        assert!(!status.write_status);
    }
    assert_eq!(chip.writes, 500);
}

#[test]
fn mcp4725_every_code_round_trips() {
    init();
    let mut chip = FakeMcp4725::new(mcp4725::DEFAULT_ADDRESS);
    let mut dac = Mcp4725::new(&mut chip, mcp4725::DEFAULT_ADDRESS).unwrap();
    let range = dac.out_range();

    for value in range.start()..range.stop() {
        dac.set_output(RawOrPercent::Raw(value)).unwrap();
        assert_eq!(i64::from(dac.get_status().unwrap().data.out_reg), value);
    }
}

#[test]
fn mcp4725_save_persists_to_eeprom() {
    init();
    let mut chip = FakeMcp4725::new(0x60);
    {
        let mut dac = Mcp4725::new(&mut chip, 0x60).unwrap();
        dac.set_status(RawOrPercent::Raw(0x7A5), 0, true).unwrap();
        let status = dac.get_status().unwrap();
        assert_eq!(status.data.out_reg, 0x7A5);
        assert_eq!(status.eeprom_data.out_reg, 0x7A5);
        assert!(status.write_status);

        // a volatile write leaves the EEPROM alone
        dac.set_status(RawOrPercent::Percent(25.0), 1, false).unwrap();
        let status = dac.get_status().unwrap();
        assert_eq!(
            status.data,
            Mcp4725Data {
                out_reg: 1024,
                power_mode: 1
            }
        );
        assert_eq!(status.eeprom_data.out_reg, 0x7A5);
    }
    assert_eq!(chip.writes, 2);
}

#[test]
fn mcp4725_full_write_drops_power_mode() {
    init();
    let mut chip = FakeMcp4725::new(0x60);
    let mut dac = Mcp4725::new(&mut chip, 0x60).unwrap();

    dac.set_status(RawOrPercent::Raw(100), 3, true).unwrap();
    let status = dac.get_status().unwrap();
    assert_eq!(status.data.out_reg, 100);
    assert_eq!(status.data.power_mode, 0);
    assert_eq!(status.eeprom_data.power_mode, 0);
}

#[test]
fn mcp4725_bus_errors_propagate() {
    init();
    let mut chip = FakeMcp4725::new(0x60);
    chip.fail = true;
    let mut dac = Mcp4725::new(chip, 0x60).unwrap();

    assert_eq!(dac.fast_write(1, 0), Err(Error::Bus(Nack)));
    assert_eq!(dac.get_status(), Err(Error::Bus(Nack)));
    // validation still wins over the bus
    assert_matches!(
        dac.fast_write(5000, 0),
        Err(Error::OutOfRange(OutOfRange::Value { value: 5000, .. }))
    );
}

#[test]
fn mcp4725_wrong_address_is_rejected_up_front() {
    init();
    assert_matches!(
        Mcp4725::new(FakeMcp4725::new(0x70), 0x70),
        Err(Error::InvalidArgument(InvalidArgument::Address(0x70)))
    );
}

#[test]
fn tlc5615_writes_reach_the_latch() {
    init();
    let mut chip = FakeTlc5615::default();
    let mut dac = Tlc5615::new(&mut chip);
    let mut rng = mk_rng();

    let mut last = 0;
    for _ in 0..500 {
        let value: i64 = rng.gen_range(0, 1024);
        dac.set_output(RawOrPercent::Raw(value)).unwrap();
        last = value;
    }
    assert_eq!(i64::from(chip.output()), last);
}

#[test]
fn tlc5615_check_write_returns_previous_frame() {
    init();
    let mut chip = FakeTlc5615::default();
    let mut dac = Tlc5615::new(&mut chip);

    assert_eq!(dac.set_output(RawOrPercent::Raw(511)), Ok(None));
    dac.set_check_write(true);
    assert_eq!(
        dac.set_output(RawOrPercent::Raw(1023)),
        Ok(Some([0x07, 0xFC]))
    );
    assert_eq!(
        dac.set_output(RawOrPercent::Percent(0.0)),
        Ok(Some([0x0F, 0xFC]))
    );
    assert_eq!(chip.output(), 0);
}

#[test]
fn tlc5615_errors() {
    init();
    let mut chip = FakeTlc5615::default();
    chip.fail = true;
    let mut dac = Tlc5615::new(chip);

    assert_matches!(
        dac.set_output(RawOrPercent::Raw(1024)),
        Err(Error::OutOfRange(OutOfRange::Value { value: 1024, .. }))
    );
    assert_matches!(
        dac.set_output(RawOrPercent::Percent(-1.0)),
        Err(Error::InvalidArgument(InvalidArgument::Percent(_)))
    );
    assert_eq!(dac.set_output(RawOrPercent::Raw(0)), Err(Error::Bus(Nack)));
    dac.set_check_write(true);
    assert_eq!(dac.write_out(0, true), Err(Error::Bus(Nack)));
}

#[test]
fn percent_bases_differ_between_drivers() {
    init();
    let mut tlc = FakeTlc5615::default();
    Tlc5615::new(&mut tlc)
        .set_output(RawOrPercent::Percent(50.0))
        .unwrap();
    // 50% of 1023
    assert_eq!(tlc.output(), 511);

    let mut mcp = FakeMcp4725::new(0x60);
    let mut dac = Mcp4725::new(&mut mcp, 0x60).unwrap();
    dac.set_output(RawOrPercent::Percent(50.0)).unwrap();
    // 50% of 4096
    assert_eq!(dac.get_status().unwrap().data.out_reg, 2048);
    assert_eq!(dac.raw(50.0), Ok(2048));
}

#[test]
fn status_serializes() {
    let status = Mcp4725Status::from_bytes(&[0x80, 0x80, 0x00, 0x40, 0x10]);
    let json = serde_json::to_value(&status).unwrap();
    assert_eq!(json["data"]["out_reg"], 0x800);
    assert_eq!(json["eeprom_data"]["out_reg"], 0x010);
    assert_eq!(json["eeprom_data"]["power_mode"], 2);
    assert_eq!(json["write_status"], true);

    let back: Mcp4725Status = serde_json::from_value(json).unwrap();
    assert_eq!(back, status);
}
